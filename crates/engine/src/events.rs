//! Progress fan-out backed by a `tokio::sync::broadcast` channel.
//!
//! A run publishes [`BulkEvent`]s as it goes; any number of observers
//! (progress bars, log sinks, tests) can subscribe independently.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::runner::BulkSummary;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// One observable step of a bulk run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BulkEvent {
    /// The run started: `total` ids split into `chunks` requests.
    Started { total: usize, chunks: usize },
    /// A chunk finished. `processed` is always `succeeded + failed`.
    Progress {
        processed: usize,
        succeeded: usize,
        failed: usize,
        total: usize,
    },
    /// The run ended, normally or after cancellation.
    Finished { summary: BulkSummary },
}

/// In-process fan-out for [`BulkEvent`]s.
///
/// # Usage
///
/// ```rust
/// use tagsweep_engine::events::{BulkEvent, ProgressBus};
///
/// let bus = ProgressBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(BulkEvent::Started { total: 25, chunks: 3 });
/// ```
pub struct ProgressBus {
    sender: broadcast::Sender<BulkEvent>,
}

impl ProgressBus {
    /// Bus with an explicit channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Send an event to every current subscriber.
    ///
    /// With zero subscribers the event is silently dropped.
    pub fn publish(&self, event: BulkEvent) {
        // Ignore the SendError, it only means there are no receivers.
        let _ = self.sender.send(event);
    }

    /// A receiver over every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<BulkEvent> {
        self.sender.subscribe()
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = ProgressBus::default();
        let mut rx = bus.subscribe();

        bus.publish(BulkEvent::Started {
            total: 25,
            chunks: 3,
        });

        match rx.recv().await.unwrap() {
            BulkEvent::Started { total, chunks } => {
                assert_eq!(total, 25);
                assert_eq!(chunks, 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = ProgressBus::new(4);
        bus.publish(BulkEvent::Progress {
            processed: 10,
            succeeded: 9,
            failed: 1,
            total: 25,
        });
    }

    #[test]
    fn events_serialise_with_tag() {
        let json = serde_json::to_value(BulkEvent::Progress {
            processed: 10,
            succeeded: 9,
            failed: 1,
            total: 25,
        })
        .unwrap();
        assert_eq!(json["event"], "progress");
        assert_eq!(json["processed"], 10);
    }
}
