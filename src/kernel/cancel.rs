use std::collections::HashMap;

use super::event::MessageId;
use super::scheduler::TimerId;

/// Tracks which message owns each live timer.
///
/// A firing is only honoured if its id is still registered here, so a timer that
/// slipped past cancellation can never mutate a replaced or torn-down session.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    live: HashMap<TimerId, MessageId>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: TimerId, owner: MessageId) {
        self.live.insert(id, owner);
    }

    /// Consumes a fired timer and returns its owner, if it was still live.
    pub fn settle(&mut self, id: TimerId) -> Option<MessageId> {
        self.live.remove(&id)
    }

    /// Forgets every timer owned by `owner` and returns their ids for cancellation.
    pub fn release(&mut self, owner: MessageId) -> Vec<TimerId> {
        let ids: Vec<TimerId> = self
            .live
            .iter()
            .filter(|(_, o)| **o == owner)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.live.remove(id);
        }
        ids
    }

    pub fn release_all(&mut self) -> Vec<TimerId> {
        self.live.drain().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
