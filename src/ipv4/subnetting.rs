//! Masks and prefixes for the routes stored in a [`Fib`](crate::Fib).
//!
//! # Usage of CIDR
//!
//! Routes are classless (CIDR). A route is identified by a network ID and a
//! prefix length from 0 to 32; the network ID is always kept masked to the
//! prefix length so two spellings of the same route compare equal.
//!
//! Wikipedia article on CIDR: <https://en.wikipedia.org/wiki/Classless_Inter-Domain_Routing>

use std::{net::Ipv4Addr, ops::RangeInclusive, str::FromStr};

use super::Ipv4Address;

/// The longest prefix an IPv4 route can have.
pub const MAX_PREFIX_LEN: u32 = 32;

/// A struct representing an Ipv4 subnet mask.
/// (It's a thin wrapper around a u32.)
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Ipv4Mask(u32);

// const version of clamp function
const fn clamp(num: u32, min: u32, max: u32) -> u32 {
    assert!(min <= max);
    if num < min {
        min
    } else if num > max {
        max
    } else {
        num
    }
}

impl std::fmt::Debug for Ipv4Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ipv4Mask")
            .field(&Ipv4Address::from(self.0))
            .finish()
    }
}

impl Ipv4Mask {
    /// Returns a mask of `size` 1s.
    /// Should be a number from 0 to 32.
    /// If `size > 32`, then it will be set to 32.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ip4_fib::ipv4::subnetting::*;
    /// // 255.255.0.0
    /// let mask = Ipv4Mask::from_bitcount(16);
    /// assert_eq!(u32::from(mask), 0xFF_FF_00_00);
    /// ```
    pub const fn from_bitcount(size: u32) -> Ipv4Mask {
        let size = clamp(size, 0, MAX_PREFIX_LEN);
        if size == 0 {
            Ipv4Mask(0)
        } else if size == MAX_PREFIX_LEN {
            Ipv4Mask(0xFF_FF_FF_FF)
        } else {
            Ipv4Mask(((1 << size) - 1) << (MAX_PREFIX_LEN - size))
        }
    }

    /// Returns the number of 1s in this mask.
    ///
    /// ```
    /// # use ip4_fib::ipv4::subnetting::*;
    /// let mask = Ipv4Mask::from_bitcount(9);
    /// assert_eq!(mask.count_ones(), 9);
    /// ```
    pub const fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    /// Turns the mask into a u32.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Clears the host bits of `address`.
    pub fn apply(self, address: Ipv4Address) -> Ipv4Address {
        Ipv4Address::from(address.to_u32() & self.0)
    }
}

impl From<Ipv4Mask> for u32 {
    fn from(mask: Ipv4Mask) -> u32 {
        mask.0
    }
}

impl From<Ipv4Mask> for Ipv4Address {
    fn from(mask: Ipv4Mask) -> Ipv4Address {
        Ipv4Address::from(mask.to_u32())
    }
}

/// `Ipv4Net` stands for "Ipv4 Network ID": the prefix of a route.
/// It is an `Ipv4Address` and an `Ipv4Mask`.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ipv4Net {
    /// This MUST be a network ID or it will screw up Eq
    network_id: Ipv4Address,
    mask: Ipv4Mask,
}

impl Ipv4Net {
    /// Creates an Ipv4Net from an IP address and mask.
    pub fn new(ip: Ipv4Address, mask: Ipv4Mask) -> Self {
        Self {
            network_id: mask.apply(ip),
            mask,
        }
    }

    /// Creates a new Ipv4Net from something that can be converted into
    /// an IP address, and a prefix length.
    /// The prefix length is clamped to the 0-32 range.
    ///
    /// # Example
    ///
    /// ```
    /// # use ip4_fib::ipv4::*;
    /// # use ip4_fib::ipv4::subnetting::*;
    /// let net1 = Ipv4Net::new_short([12, 13, 12, 0], 28);
    /// let net2 = Ipv4Net::new(Ipv4Address::from([12, 13, 12, 0]), Ipv4Mask::from_bitcount(28));
    /// assert_eq!(net1, net2);
    /// ```
    pub fn new_short(ip: impl Into<Ipv4Address>, prefix_len: u32) -> Ipv4Net {
        Ipv4Net::new(ip.into(), Ipv4Mask::from_bitcount(prefix_len))
    }

    /// The network matching every address, `0.0.0.0/0`.
    pub fn default_route() -> Self {
        Self::new_short(Ipv4Address::CURRENT_NETWORK, 0)
    }

    /// Turns an string in [CIDR notation](https://en.wikipedia.org/wiki/Classless_Inter-Domain_Routing#CIDR_notation)
    /// into an `Ipv4Net`.
    ///
    /// Returns an error if the string is not of form `ip_address/prefix_length`
    /// or the prefix length is greater than 32.
    pub fn from_cidr(cidr: &str) -> Result<Ipv4Net, CidrParseError> {
        cidr_to_ip(cidr).map(Ipv4Net::from)
    }

    /// Returns the first IP address in this network.
    ///
    /// ```
    /// # use ip4_fib::ipv4::subnetting::*;
    /// # use ip4_fib::ipv4::*;
    /// let net = Ipv4Net::from_cidr("10.0.0.119/24").unwrap();
    /// assert_eq!(net.id(), Ipv4Address::from([10, 0, 0, 0]));
    /// ```
    pub fn id(&self) -> Ipv4Address {
        self.network_id
    }

    /// Returns the last IP address in this network.
    pub fn broadcast(&self) -> Ipv4Address {
        Ipv4Address::from(self.id().to_u32() | !self.mask.to_u32())
    }

    /// Returns the `Ipv4Mask` of this network.
    pub fn mask(&self) -> Ipv4Mask {
        self.mask
    }

    /// Returns the prefix length of this network.
    pub fn len(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Returns `true` for the default route `0.0.0.0/0`.
    pub fn is_default(&self) -> bool {
        self.len() == 0
    }

    /// Converts this network to a range of IP addresses.
    pub fn range(&self) -> RangeInclusive<Ipv4Address> {
        self.id()..=self.broadcast()
    }

    /// Returns `true` if the `address` is contained in this network.
    pub fn contains(&self, address: Ipv4Address) -> bool {
        self.mask.apply(address) == self.id()
    }

    /// Returns the network of length `prefix_len` that contains this one.
    /// `prefix_len` must not exceed this network's own length.
    pub fn supernet(&self, prefix_len: u32) -> Ipv4Net {
        debug_assert!(prefix_len <= self.len());
        Ipv4Net::new_short(self.network_id, prefix_len)
    }
}

impl From<(Ipv4Address, Ipv4Mask)> for Ipv4Net {
    fn from(value: (Ipv4Address, Ipv4Mask)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Ipv4Net> for (Ipv4Address, Ipv4Mask) {
    fn from(value: Ipv4Net) -> Self {
        (value.id(), value.mask())
    }
}

impl FromStr for Ipv4Net {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4Net::from_cidr(s)
    }
}

impl std::fmt::Debug for Ipv4Net {
    /// The results will be of form `Ipv4Net {10.0.0.0/8}`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Ipv4Net {{{}/{}}}", self.network_id, self.len()))
    }
}

impl std::fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network_id, self.len())
    }
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CidrParseError {
    #[error("Failed to parse the address of a CIDR string")]
    Ipv4,
    #[error("Failed to parse the prefix length of a CIDR string")]
    Mask(#[from] std::num::ParseIntError),
    #[error("Prefix length {0} is longer than 32 bits")]
    Length(u32),
}

/// Turns an string in [CIDR notation](https://en.wikipedia.org/wiki/Classless_Inter-Domain_Routing#CIDR_notation)
/// into an Ipv4 address and a subnet mask.
///
/// Returns an error if the string is not of form `ip_address/prefix_length`.
///
/// # Examples
///
/// ```
/// # use ip4_fib::ipv4::subnetting::*;
/// # use ip4_fib::ipv4::Ipv4Address;
/// let (ip, mask) = cidr_to_ip("123.45.67.8/14").unwrap();
/// assert_eq!(ip, Ipv4Address::new([123, 45, 67, 8]));
/// assert_eq!(mask, Ipv4Mask::from_bitcount(14));
///
/// let result = cidr_to_ip("5.6.7.8");
/// result.expect_err("5.6.7.8 is just an IP address, not CIDR notation!");
/// ```
pub fn cidr_to_ip(cidr: &str) -> Result<(Ipv4Address, Ipv4Mask), CidrParseError> {
    let mut parts = cidr.split('/');
    let mut next = || parts.next().ok_or(CidrParseError::Ipv4);
    let ip_str = next()?;
    let mask_str = next()?;

    let ip = Ipv4Addr::from_str(ip_str)
        .or(Err(CidrParseError::Ipv4))?
        .into();
    let prefix_len = u32::from_str(mask_str)?;
    if prefix_len > MAX_PREFIX_LEN {
        return Err(CidrParseError::Length(prefix_len));
    }
    Ok((ip, Ipv4Mask::from_bitcount(prefix_len)))
}
