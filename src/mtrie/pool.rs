use super::{
    leaf::{Leaf, PlyIndex},
    ply::Ply,
};

/// A growable arena of plies addressed by [`PlyIndex`].
///
/// Freed plies go on a free list and are handed out again before the arena
/// grows. A ply never moves to a different index while it is allocated.
#[derive(Debug, Default)]
pub struct PlyPool {
    plies: Vec<Ply>,
    free: Vec<PlyIndex>,
}

impl PlyPool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            plies: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Returns a ply whose slots all hold `fill` with recorded length `fill_len`.
    pub fn allocate(&mut self, fill: Leaf, fill_len: u8) -> PlyIndex {
        let index = match self.free.pop() {
            Some(index) => {
                self.plies[index.as_usize()].fill(fill, fill_len);
                index
            }
            None => {
                let index = PlyIndex::new(self.plies.len());
                self.plies.push(Ply::new(index, fill, fill_len));
                index
            }
        };
        tracing::trace!("allocated {} filled with {:?}/{}", index, fill, fill_len);
        index
    }

    /// Returns a ply to the pool. The caller must already have unlinked it.
    pub fn free(&mut self, index: PlyIndex) {
        assert_ne!(index, PlyIndex::ROOT, "the root ply is never freed");
        debug_assert!(!self.free.contains(&index), "{} freed twice", index);
        self.plies[index.as_usize()].fill(Leaf::EMPTY, 0);
        self.free.push(index);
        tracing::trace!("freed {}", index);
    }

    pub fn get(&self, index: PlyIndex) -> &Ply {
        &self.plies[index.as_usize()]
    }

    pub fn get_mut(&mut self, index: PlyIndex) -> &mut Ply {
        &mut self.plies[index.as_usize()]
    }

    /// The number of plies currently allocated.
    pub fn in_use(&self) -> usize {
        self.plies.len() - self.free.len()
    }

    pub(crate) fn is_free(&self, index: PlyIndex) -> bool {
        self.free.contains(&index)
    }
}
