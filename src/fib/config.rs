/// Settings for one [`Fib`](super::Fib).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FibConfig {
    /// Identifies the table in log events.
    pub table_id: u32,
    /// Plies to reserve up front. The pool still grows past this.
    pub ply_capacity: usize,
}

impl FibConfig {
    /// Enough plies for a few dozen routes longer than /8.
    pub const DEFAULT_PLY_CAPACITY: usize = 64;

    pub fn with_table_id(mut self, table_id: u32) -> Self {
        self.table_id = table_id;
        self
    }

    pub fn with_ply_capacity(mut self, ply_capacity: usize) -> Self {
        self.ply_capacity = ply_capacity;
        self
    }
}

impl Default for FibConfig {
    fn default() -> Self {
        Self {
            table_id: 0,
            ply_capacity: Self::DEFAULT_PLY_CAPACITY,
        }
    }
}
