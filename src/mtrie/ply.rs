use super::leaf::{Leaf, PlyIndex};

/// Number of slots in a ply, one per value of an address byte.
pub const PLY_SLOTS: usize = 256;

/// One level of the trie: 256 slots indexed by one address byte.
///
/// Next to each leaf the ply records the length of the prefix that last
/// painted the slot. Inserts use it to decide whether they may overwrite the
/// slot and deletes use it to find the slots that belong to the deleted route.
#[derive(Clone)]
pub struct Ply {
    leaves: [Leaf; PLY_SLOTS],
    prefix_lens: [u8; PLY_SLOTS],
    n_non_empty: u16,
    index: PlyIndex,
}

impl Ply {
    pub fn new(index: PlyIndex, fill: Leaf, fill_len: u8) -> Self {
        let mut ply = Self {
            leaves: [Leaf::EMPTY; PLY_SLOTS],
            prefix_lens: [0; PLY_SLOTS],
            n_non_empty: 0,
            index,
        };
        ply.fill(fill, fill_len);
        ply
    }

    /// Overwrites every slot with `leaf`, recording `prefix_len` for each.
    pub fn fill(&mut self, leaf: Leaf, prefix_len: u8) {
        self.leaves = [leaf; PLY_SLOTS];
        self.prefix_lens = [prefix_len; PLY_SLOTS];
        self.n_non_empty = if leaf.is_empty() { 0 } else { PLY_SLOTS as u16 };
    }

    pub fn index(&self) -> PlyIndex {
        self.index
    }

    pub fn leaf(&self, slot: u8) -> Leaf {
        self.leaves[slot as usize]
    }

    pub fn prefix_len(&self, slot: u8) -> u8 {
        self.prefix_lens[slot as usize]
    }

    pub fn set_prefix_len(&mut self, slot: u8, prefix_len: u8) {
        self.prefix_lens[slot as usize] = prefix_len;
    }

    /// Writes a slot, keeping the non-empty count in step.
    pub fn set_leaf(&mut self, slot: u8, leaf: Leaf, prefix_len: u8) {
        let old = std::mem::replace(&mut self.leaves[slot as usize], leaf);
        self.prefix_lens[slot as usize] = prefix_len;
        match (old.is_empty(), leaf.is_empty()) {
            (true, false) => self.n_non_empty += 1,
            (false, true) => {
                self.n_non_empty = self
                    .n_non_empty
                    .checked_sub(1)
                    .expect("ply non-empty count underflow")
            }
            _ => {}
        }
    }

    pub fn n_non_empty(&self) -> usize {
        self.n_non_empty as usize
    }

    pub fn is_empty(&self) -> bool {
        self.n_non_empty == 0
    }

    pub fn leaves(&self) -> impl Iterator<Item = (u8, Leaf)> + '_ {
        (0..=u8::MAX).map(move |slot| (slot, self.leaf(slot)))
    }
}

impl std::fmt::Debug for Ply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ply")
            .field("index", &self.index)
            .field("n_non_empty", &self.n_non_empty)
            .finish_non_exhaustive()
    }
}
