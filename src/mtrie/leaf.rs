use std::fmt;

use crate::Adj;

/// The position of a [`Ply`](super::ply::Ply) in its [`PlyPool`](super::pool::PlyPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlyIndex(u32);

impl PlyIndex {
    /// The root ply. It is allocated with the trie and never freed.
    pub const ROOT: Self = Self(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("ply pool outgrew a 32-bit index"))
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ply#{}", self.0)
    }
}

/// The contents of one ply slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leaf {
    /// A resolved route. Lookups stop here.
    Terminal(Adj),
    /// The slot is split further by the next address byte.
    Internal(PlyIndex),
}

impl Leaf {
    /// The leaf of a slot no route has painted.
    pub const EMPTY: Self = Leaf::Terminal(Adj::MISS);

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Leaf::Terminal(_))
    }
}

impl Default for Leaf {
    fn default() -> Self {
        Self::EMPTY
    }
}
