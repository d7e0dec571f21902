use rustc_hash::FxHashMap;

use crate::{
    ipv4::{subnetting::MAX_PREFIX_LEN, Ipv4Net},
    Adj, Ipv4Address,
};

/// The authoritative record of installed routes.
///
/// One exact-match table per prefix length, keyed by the network ID masked to
/// that length. The trie is an index derived from this table; deletes consult
/// it to find the route that takes over a vacated range.
#[derive(Debug, Clone)]
pub struct MapFib {
    by_len: Vec<FxHashMap<Ipv4Address, Adj>>,
}

impl MapFib {
    pub fn new() -> Self {
        Self {
            by_len: vec![FxHashMap::default(); MAX_PREFIX_LEN as usize + 1],
        }
    }

    fn table(&self, net: Ipv4Net) -> &FxHashMap<Ipv4Address, Adj> {
        &self.by_len[net.len() as usize]
    }

    /// Records `net` as routed to `adj`, returning the adjacency it replaces.
    pub fn set(&mut self, net: Ipv4Net, adj: Adj) -> Option<Adj> {
        self.by_len[net.len() as usize].insert(net.id(), adj)
    }

    /// Forgets `net`, returning the adjacency it was routed to.
    pub fn unset(&mut self, net: Ipv4Net) -> Option<Adj> {
        self.by_len[net.len() as usize].remove(&net.id())
    }

    /// Exact match on `net`.
    pub fn get(&self, net: Ipv4Net) -> Option<Adj> {
        self.table(net).get(&net.id()).copied()
    }

    /// Longest-prefix match by scanning every length from 32 down to 0.
    pub fn lookup(&self, address: Ipv4Address) -> Adj {
        (0..=MAX_PREFIX_LEN)
            .rev()
            .find_map(|len| self.get(Ipv4Net::new_short(address, len)))
            .unwrap_or(Adj::MISS)
    }

    /// Returns the longest installed route strictly containing `net`, not
    /// counting the default route.
    pub fn covering(&self, net: Ipv4Net) -> Option<(Ipv4Net, Adj)> {
        (1..net.len()).rev().find_map(|len| {
            let cover = net.supernet(len);
            self.get(cover).map(|adj| (cover, adj))
        })
    }

    /// Calls `f` on every route, shortest prefixes first and by address within
    /// a length.
    pub fn foreach(&self, mut f: impl FnMut(Ipv4Net, Adj)) {
        for (len, table) in self.by_len.iter().enumerate() {
            let mut routes: Vec<_> = table.iter().map(|(id, adj)| (*id, *adj)).collect();
            routes.sort_unstable();
            for (id, adj) in routes {
                f(Ipv4Net::new_short(id, len as u32), adj);
            }
        }
    }

    /// The number of installed routes.
    pub fn len(&self) -> usize {
        self.by_len.iter().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_len.iter().all(|table| table.is_empty())
    }
}

impl Default for MapFib {
    fn default() -> Self {
        Self::new()
    }
}
