//! The route table callers interact with.
//!
//! A [`Fib`] keeps two views of the same routes. The [`MapFib`] records what
//! was installed; the [`Mtrie`] answers lookups. Every change goes to the
//! record first and is then painted into the trie.

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    ipv4::{subnetting::MAX_PREFIX_LEN, Ipv4Net},
    logging::route_event,
    map_fib::MapFib,
    mtrie::Mtrie,
    Adj, Ipv4Address,
};

mod config;
pub use config::FibConfig;

mod hooks;
pub use hooks::{ChangeHook, ChannelHook, HookError, RouteChange};

/// An IPv4 forwarding table.
///
/// Lookups take `&self` and mutations `&mut self`; share a table between a
/// forwarding thread and a control thread behind a lock.
pub struct Fib {
    config: FibConfig,
    mtrie: Mtrie,
    map: MapFib,
    hooks: Vec<Box<dyn ChangeHook>>,
}

impl Fib {
    pub fn new() -> Self {
        Self::with_config(FibConfig::default())
    }

    pub fn with_config(config: FibConfig) -> Self {
        Self {
            config,
            mtrie: Mtrie::with_capacity(config.ply_capacity),
            map: MapFib::new(),
            hooks: Vec::new(),
        }
    }

    pub fn config(&self) -> &FibConfig {
        &self.config
    }

    /// Returns the adjacency of the longest installed prefix containing
    /// `address`, or [`Adj::MISS`].
    pub fn lookup(&self, address: Ipv4Address) -> Adj {
        self.mtrie.lookup(address)
    }

    /// Installs or replaces the route `address/len`.
    ///
    /// Host bits of `address` are ignored.
    pub fn set(&mut self, address: Ipv4Address, len: u32, adj: Adj) -> Result<(), FibError> {
        let net = prefix(address, len)?;
        if adj.is_miss() {
            return Err(FibError::MissAdjacency(net));
        }

        self.map.set(net, adj);
        if net.is_default() {
            self.mtrie.set_default_route(adj);
        } else {
            self.mtrie.insert(net, adj);
        }
        route_event(self.config.table_id, net, adj, true);
        self.after_update();

        self.notify(RouteChange {
            address: net.id(),
            len,
            adj,
            is_set: true,
        });
        Ok(())
    }

    /// Removes the route `address/len` and returns the adjacency it had.
    ///
    /// Addresses it covered fall back to the next shorter installed route.
    /// Hooks see the change before the route is removed.
    pub fn unset(&mut self, address: Ipv4Address, len: u32) -> Result<Adj, FibError> {
        let net = prefix(address, len)?;
        let adj = self.map.get(net).ok_or(FibError::RouteNotFound(net))?;

        self.notify(RouteChange {
            address: net.id(),
            len,
            adj,
            is_set: false,
        });

        self.map.unset(net);
        if net.is_default() {
            self.mtrie.clear_default_route();
        } else {
            self.mtrie.remove(net, adj);
            if let Some((cover, cover_adj)) = self.map.covering(net) {
                tracing::trace!("restoring {} over vacated {}", cover, net);
                self.mtrie.insert(cover, cover_adj);
            }
        }
        route_event(self.config.table_id, net, adj, false);
        self.after_update();
        Ok(adj)
    }

    /// Exact match on the installed route `address/len`.
    pub fn get(&self, address: Ipv4Address, len: u32) -> Result<Option<Adj>, FibError> {
        Ok(self.map.get(prefix(address, len)?))
    }

    pub fn register_change_hook(&mut self, hook: impl ChangeHook) {
        self.hooks.push(Box::new(hook));
    }

    /// Registers a hook that forwards every change to the returned receiver.
    pub fn subscribe(&mut self) -> UnboundedReceiver<RouteChange> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.register_change_hook(ChannelHook::new(sender));
        receiver
    }

    /// Calls `f` on every installed route, shortest prefixes first.
    pub fn foreach(&self, f: impl FnMut(Ipv4Net, Adj)) {
        self.map.foreach(f)
    }

    /// The authoritative record of installed routes.
    pub fn routes(&self) -> &MapFib {
        &self.map
    }

    /// The number of installed routes, the default route included.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn default_route(&self) -> Adj {
        self.mtrie.default_route()
    }

    /// The number of trie plies allocated, the root included.
    pub fn plies_in_use(&self) -> usize {
        self.mtrie.plies_in_use()
    }

    /// Panics if the trie's internal bookkeeping is inconsistent.
    pub fn check_invariants(&self) {
        self.mtrie.check_invariants()
    }

    fn after_update(&self) {
        #[cfg(feature = "check_invariants")]
        self.mtrie.check_invariants();
    }

    fn notify(&mut self, change: RouteChange) {
        let table_id = self.config.table_id;
        for (i, hook) in self.hooks.iter_mut().enumerate() {
            if let Err(e) = hook.route_changed(&change) {
                tracing::error!(
                    table = table_id,
                    prefix = %change.net(),
                    "change hook {} failed: {}",
                    i,
                    e
                );
            }
        }
    }
}

impl Default for Fib {
    fn default() -> Self {
        Self::new()
    }
}

fn prefix(address: Ipv4Address, len: u32) -> Result<Ipv4Net, FibError> {
    if len > MAX_PREFIX_LEN {
        return Err(FibError::InvalidLength(len));
    }
    Ok(Ipv4Net::new_short(address, len))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    #[error("Prefix length {0} is longer than 32 bits")]
    InvalidLength(u32),
    #[error("{0} cannot be routed to the miss adjacency")]
    MissAdjacency(Ipv4Net),
    #[error("There is no route for {0}")]
    RouteNotFound(Ipv4Net),
}
