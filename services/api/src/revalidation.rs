//! Cache revalidation signals for the rendering layer
//!
//! Mutations publish the paths whose rendered output is now stale. Whatever
//! renders pages subscribes and refreshes; with no subscriber the signal is
//! only logged.

use tokio::sync::broadcast;
use tracing::info;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct RevalidationBus {
    sender: broadcast::Sender<String>,
}

impl Default for RevalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RevalidationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Announce that `path` must be re-rendered
    pub fn publish(&self, path: impl Into<String>) {
        let path = path.into();
        info!("Revalidating {}", path);
        // No subscribers is not an error
        let _ = self.sender.send(path);
    }
}
