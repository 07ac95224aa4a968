use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OccurrenceStatus {
    /// Continue to post / celebrate the event
    Default,
    /// Skip the event for the current cycle
    Skipped,
}

/// One resolved upcoming instance of a `CelebrationEvent`. There is at most
/// one live occurrence per event at a time, which is what makes reminder and
/// celebration generation idempotent within a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOccurrence {
    pub id: ID,
    pub event_id: ID,
    /// UTC timestamp in millis of the upcoming celebration post time
    pub scheduled_at: i64,
    pub status: OccurrenceStatus,
}

impl EventOccurrence {
    pub fn new(event_id: ID, scheduled_at: i64) -> Self {
        Self {
            id: ID::new(),
            event_id,
            scheduled_at,
            status: OccurrenceStatus::Default,
        }
    }
}

impl Entity for EventOccurrence {
    fn id(&self) -> &ID {
        &self.id
    }
}
