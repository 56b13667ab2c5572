//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fan-out of a single shutdown event.
///
/// The server and any background task hold a receiver; `trigger` wakes all
/// of them. Receivers created after the trigger never fire, so subscribe
/// before spawning.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Wake every subscriber. Repeated triggers are harmless; a receiver
    /// that misses some sees a lag error, which still ends its wait.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers that have not been dropped yet.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
