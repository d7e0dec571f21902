//! A multi-bit trie over the four bytes of an IPv4 address.
//!
//! Every level of the trie is a [`Ply`] of 256 slots indexed by one address
//! byte, so a lookup reads at most four slots. A route whose prefix ends in
//! the middle of a byte is painted across every slot that byte's don't-care
//! bits allow. When routes overlap, each slot remembers the length of the
//! prefix that painted it and only equal or longer prefixes may paint over it.
//!
//! The default route (`0.0.0.0/0`) is not painted. It lives in its own field
//! and [`Mtrie::lookup`] falls back to it whenever the walk ends on an empty
//! slot.

use std::ops::RangeInclusive;

use crate::{ipv4::Ipv4Net, Adj, Ipv4Address};

pub mod leaf;
pub mod ply;
pub mod pool;

pub use leaf::{Leaf, PlyIndex};
pub use ply::Ply;
pub use pool::PlyPool;

/// Number of bytes, and so of trie levels, in an address.
const ADDRESS_BYTES: usize = 4;

pub struct Mtrie {
    pool: PlyPool,
    default_route: Adj,
}

impl Mtrie {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a trie whose pool has room for `capacity` plies before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = PlyPool::with_capacity(capacity.max(1));
        let root = pool.allocate(Leaf::EMPTY, 0);
        debug_assert_eq!(root, PlyIndex::ROOT);
        Self {
            pool,
            default_route: Adj::MISS,
        }
    }

    /// Returns the adjacency of the longest prefix containing `address`.
    pub fn lookup(&self, address: Ipv4Address) -> Adj {
        let mut ply = self.pool.get(PlyIndex::ROOT);
        for depth in 0..ADDRESS_BYTES {
            match ply.leaf(address.byte(depth)) {
                Leaf::Terminal(adj) if adj.is_miss() => return self.default_route,
                Leaf::Terminal(adj) => return adj,
                Leaf::Internal(child) => ply = self.pool.get(child),
            }
        }
        unreachable!("lookup of {} walked past the last address byte", address)
    }

    pub fn default_route(&self) -> Adj {
        self.default_route
    }

    pub fn set_default_route(&mut self, adj: Adj) {
        self.default_route = adj;
    }

    pub fn clear_default_route(&mut self) {
        self.default_route = Adj::MISS;
    }

    /// Paints `adj` over every address of `net` not owned by a longer prefix.
    ///
    /// `net` must not be the default route.
    pub fn insert(&mut self, net: Ipv4Net, adj: Adj) {
        assert!(!net.is_default(), "the default route is not painted");
        self.set_leaf(PlyIndex::ROOT, 0, net, Leaf::Terminal(adj));
    }

    /// Clears every slot painted by `net` with `adj`, freeing plies left empty.
    ///
    /// Slots are cleared, not repainted; the caller restores the covering
    /// route, if there is one.
    pub fn remove(&mut self, net: Ipv4Net, adj: Adj) {
        assert!(!net.is_default(), "the default route is not painted");
        self.unset_leaf(PlyIndex::ROOT, 0, net, Leaf::Terminal(adj));
        let root = self.pool.get_mut(PlyIndex::ROOT);
        if root.is_empty() {
            root.fill(Leaf::EMPTY, 0);
        }
    }

    /// The number of plies allocated, the root included.
    pub fn plies_in_use(&self) -> usize {
        self.pool.in_use()
    }

    fn set_leaf(&mut self, index: PlyIndex, depth: usize, net: Ipv4Net, leaf: Leaf) {
        let prefix_len = net.len();
        let byte = net.id().byte(depth);

        if prefix_len > ply_end_bit(depth) {
            // The prefix is longer than this ply resolves: descend, splitting
            // the slot if it still holds a terminal leaf.
            let ply = self.pool.get(index);
            let child = match ply.leaf(byte) {
                Leaf::Internal(child) => child,
                terminal => {
                    let fill_len = ply.prefix_len(byte);
                    let child = self.pool.allocate(terminal, fill_len);
                    self.pool
                        .get_mut(index)
                        .set_leaf(byte, Leaf::Internal(child), fill_len);
                    child
                }
            };
            self.set_leaf(child, depth + 1, net, leaf);
            return;
        }

        for slot in slot_range(byte, prefix_len, depth) {
            let ply = self.pool.get_mut(index);
            let owner_len = u32::from(ply.prefix_len(slot));
            match ply.leaf(slot) {
                Leaf::Terminal(_) => {
                    if owner_len <= prefix_len {
                        ply.set_leaf(slot, leaf, prefix_len as u8);
                    }
                }
                Leaf::Internal(child) => {
                    if owner_len <= prefix_len {
                        ply.set_prefix_len(slot, prefix_len as u8);
                    }
                    // Parts of the child may be owned by longer prefixes,
                    // others may still be waiting for this one.
                    self.set_leaf(child, depth + 1, net, leaf);
                }
            }
        }
    }

    /// Returns `true` if the ply at `index` is not the root and became empty.
    fn unset_leaf(&mut self, index: PlyIndex, depth: usize, net: Ipv4Net, leaf: Leaf) -> bool {
        let prefix_len = net.len();
        let byte = net.id().byte(depth);
        let slots = if prefix_len > ply_end_bit(depth) {
            byte..=byte
        } else {
            slot_range(byte, prefix_len, depth)
        };

        for slot in slots {
            let ply = self.pool.get(index);
            match ply.leaf(slot) {
                Leaf::Internal(child) => {
                    if self.unset_leaf(child, depth + 1, net, leaf) {
                        self.pool.get_mut(index).set_leaf(slot, Leaf::EMPTY, 0);
                        self.pool.free(child);
                    }
                }
                terminal => {
                    if terminal == leaf && u32::from(ply.prefix_len(slot)) == prefix_len {
                        self.pool.get_mut(index).set_leaf(slot, Leaf::EMPTY, 0);
                    }
                }
            }
        }

        index != PlyIndex::ROOT && self.pool.get(index).is_empty()
    }

    /// Walks every ply reachable from the root and panics if the trie is
    /// inconsistent: a slot count that disagrees with its slots, an empty
    /// non-root ply still linked, an internal leaf on the last level, a link
    /// to a freed ply, or an allocated ply that nothing links to.
    pub fn check_invariants(&self) {
        let mut stack = vec![(PlyIndex::ROOT, 0usize)];
        let mut reachable = 0usize;

        while let Some((index, depth)) = stack.pop() {
            assert!(depth < ADDRESS_BYTES, "{} linked below the last level", index);
            assert!(!self.pool.is_free(index), "{} is linked but free", index);
            reachable += 1;

            let ply = self.pool.get(index);
            assert_eq!(ply.index(), index, "ply stored under the wrong index");

            let mut non_empty = 0usize;
            for (slot, leaf) in ply.leaves() {
                match leaf {
                    Leaf::Terminal(adj) => {
                        if !adj.is_miss() {
                            non_empty += 1;
                            let owner_len = u32::from(ply.prefix_len(slot));
                            assert!(
                                owner_len > 0 && owner_len <= ply_end_bit(depth),
                                "{} slot {} owned by a /{} prefix",
                                index,
                                slot,
                                owner_len
                            );
                        }
                    }
                    Leaf::Internal(child) => {
                        non_empty += 1;
                        stack.push((child, depth + 1));
                    }
                }
            }
            assert_eq!(ply.n_non_empty(), non_empty, "{} miscounted its slots", index);
            if index != PlyIndex::ROOT {
                assert_ne!(non_empty, 0, "empty {} is still linked", index);
            }
        }

        assert_eq!(reachable, self.pool.in_use(), "allocated plies leaked");
    }
}

impl Default for Mtrie {
    fn default() -> Self {
        Self::new()
    }
}

/// The number of address bits resolved once the ply at `depth` is read.
fn ply_end_bit(depth: usize) -> u32 {
    8 * (depth as u32 + 1)
}

/// The slots of the ply at `depth` covered by a prefix of `prefix_len` bits
/// whose byte at that depth is `byte`. The prefix must end at or before the
/// end of this ply.
fn slot_range(byte: u8, prefix_len: u32, depth: usize) -> RangeInclusive<u8> {
    let ply_start_bit = 8 * depth as u32;
    let fixed_bits = prefix_len.saturating_sub(ply_start_bit).min(8);
    let dont_care = ((1u16 << (8 - fixed_bits)) - 1) as u8;
    (byte & !dont_care)..=(byte | dont_care)
}
