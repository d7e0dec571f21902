use std::fmt::{self, Display};

/// A handle to a forwarding action in an adjacency table owned by the caller.
///
/// The FIB only stores and compares adjacencies. `Adj::MISS` is reserved to
/// mean "no route" and is what [`Fib::lookup`](crate::Fib::lookup) returns
/// when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Adj(u32);

impl Adj {
    /// The result of a lookup that matched no route.
    pub const MISS: Self = Self(0);

    pub const fn new(handle: u32) -> Self {
        Self(handle)
    }

    pub const fn is_miss(self) -> bool {
        self.0 == Self::MISS.0
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl Display for Adj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_miss() {
            write!(f, "miss")
        } else {
            write!(f, "adj-{}", self.0)
        }
    }
}

impl From<u32> for Adj {
    fn from(handle: u32) -> Self {
        Self(handle)
    }
}

impl From<Adj> for u32 {
    fn from(adj: Adj) -> Self {
        adj.0
    }
}
