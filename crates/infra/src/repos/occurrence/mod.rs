mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryOccurrenceRepo;
use jubilee_domain::{EventOccurrence, OccurrenceStatus, ID};
pub use postgres::PostgresOccurrenceRepo;

#[async_trait::async_trait]
pub trait IOccurrenceRepo: Send + Sync {
    async fn insert(&self, occurrence: &EventOccurrence) -> anyhow::Result<()>;
    async fn find(&self, occurrence_id: &ID) -> Option<EventOccurrence>;
    /// At most one live occurrence exists per event
    async fn find_by_event(&self, event_id: &ID) -> Option<EventOccurrence>;
    /// Occurrences scheduled within the minute containing `instant`,
    /// excluding ones marked as skipped
    async fn find_due_at(&self, instant: i64) -> anyhow::Result<Vec<EventOccurrence>>;
    async fn update_status(&self, occurrence_id: &ID, status: OccurrenceStatus) -> bool;
    async fn delete(&self, occurrence_id: &ID) -> Option<EventOccurrence>;
    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult;
}

/// Truncates a timestamp in millis down to the minute it belongs to
pub fn minute_floor(instant: i64) -> i64 {
    instant - instant.rem_euclid(60 * 1000)
}

#[cfg(test)]
mod test {
    use super::minute_floor;

    #[test]
    fn floors_to_the_containing_minute() {
        assert_eq!(minute_floor(0), 0);
        assert_eq!(minute_floor(59_999), 0);
        assert_eq!(minute_floor(60_000), 60_000);
        assert_eq!(minute_floor(90_500), 60_000);
    }
}
