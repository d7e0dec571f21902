//! Wrapper functions for logging route table events.
//!
//! The route table emits `tracing` events on its own; these helpers give the
//! events a fixed target and field layout so a log file can be replayed or
//! filtered by table.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing::{event, Level};
use tracing_subscriber::FmtSubscriber;

use crate::{ipv4::Ipv4Net, Adj};

/// Installs a global subscriber writing JSON events to `fib-<date>.log`
/// inside `dir`. Should only be called once per process.
pub fn init_events(dir: impl AsRef<Path>) -> Result<(), LogInitError> {
    let file_path = dir.as_ref().join(format!(
        "fib-{}.log",
        chrono::offset::Local::now().format("%y-%m-%d")
    ));
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;
    let subscriber = FmtSubscriber::builder()
        .with_writer(Arc::new(file))
        .with_max_level(Level::DEBUG)
        .json()
        .finish();
    // every table in the process logs to the same file
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Route event handler.
/// Captures the following data: table, prefix, adj, is_set
pub(crate) fn route_event(table_id: u32, net: Ipv4Net, adj: Adj, is_set: bool) {
    event!(
        target: "ROUTE",
        Level::DEBUG,
        table = table_id,
        prefix = %net,
        adj = adj.to_u32(),
        is_set
    );
}

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("Failed to open the log file: {0}")]
    File(#[from] io::Error),
    #[error("A global subscriber is already installed")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}
