//! Notifications of route changes.
//!
//! Hooks observe a [`Fib`](super::Fib); they cannot veto a change. A hook that
//! fails is logged and the change stands.

use tokio::sync::mpsc::UnboundedSender;

use crate::{ipv4::Ipv4Net, Adj, Ipv4Address};

/// A route being installed (`is_set`) or about to be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteChange {
    /// The network ID of the route.
    pub address: Ipv4Address,
    /// The prefix length of the route.
    pub len: u32,
    pub adj: Adj,
    pub is_set: bool,
}

impl RouteChange {
    pub fn net(&self) -> Ipv4Net {
        Ipv4Net::new_short(self.address, self.len)
    }
}

/// Something to call after every route change, in registration order.
pub trait ChangeHook: Send + Sync + 'static {
    fn route_changed(&mut self, change: &RouteChange) -> Result<(), HookError>;
}

impl<F> ChangeHook for F
where
    F: FnMut(&RouteChange) -> Result<(), HookError> + Send + Sync + 'static,
{
    fn route_changed(&mut self, change: &RouteChange) -> Result<(), HookError> {
        self(change)
    }
}

/// Forwards every change into a channel, for consumers running elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelHook(UnboundedSender<RouteChange>);

impl ChannelHook {
    pub fn new(sender: UnboundedSender<RouteChange>) -> Self {
        Self(sender)
    }
}

impl ChangeHook for ChannelHook {
    fn route_changed(&mut self, change: &RouteChange) -> Result<(), HookError> {
        self.0.send(*change).or(Err(HookError::Closed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    #[error("The receiver of route changes was dropped")]
    Closed,
    #[error("Route change rejected: {0}")]
    Rejected(String),
}
