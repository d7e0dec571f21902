//! An IPv4 forwarding information base: the table that maps a destination
//! address to the adjacency of its longest matching route.
//!
//! # Organization
//! - [`Fib`] is the route table; callers only need it
//! - [`MapFib`](map_fib::MapFib) records installed routes exactly
//! - [`Mtrie`](mtrie::Mtrie) answers lookups in at most four steps
//! - [`ipv4`] provides addresses and prefixes
//!
//! # Example
//!
//! ```
//! # use ip4_fib::{Adj, Fib, Ipv4Address};
//! let mut fib = Fib::new();
//! fib.set(Ipv4Address::new([10, 0, 0, 0]), 8, Adj::new(1)).unwrap();
//! fib.set(Ipv4Address::new([10, 1, 0, 0]), 16, Adj::new(2)).unwrap();
//!
//! assert_eq!(fib.lookup(Ipv4Address::new([10, 1, 2, 3])), Adj::new(2));
//! assert_eq!(fib.lookup(Ipv4Address::new([10, 2, 0, 0])), Adj::new(1));
//!
//! fib.unset(Ipv4Address::new([10, 1, 0, 0]), 16).unwrap();
//! assert_eq!(fib.lookup(Ipv4Address::new([10, 1, 2, 3])), Adj::new(1));
//! ```

pub mod logging;

pub mod ipv4;
pub use ipv4::{Ipv4Address, Ipv4Net};

mod adjacency;
pub use adjacency::Adj;

pub mod map_fib;
pub mod mtrie;

pub mod fib;
pub use fib::{ChangeHook, Fib, FibConfig, FibError, HookError, RouteChange};
