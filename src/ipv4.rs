//! Addresses and prefixes of [Internet Protocol version
//! 4](https://datatracker.ietf.org/doc/html/rfc791) routes.

mod ipv4_address;
pub use ipv4_address::Ipv4Address;

pub mod subnetting;
pub use subnetting::{Ipv4Mask, Ipv4Net};
