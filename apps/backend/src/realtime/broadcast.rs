use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::{VetoEvent, VetoEventSink};

pub const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out over a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<VetoEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VetoEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl VetoEventSink for BroadcastSink {
    async fn publish(&self, event: VetoEvent) {
        let session_id = event.session_id();
        if self.sender.send(event).is_err() {
            debug!(session_id, "no veto event subscribers");
        }
    }
}
