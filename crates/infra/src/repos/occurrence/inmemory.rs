use super::{minute_floor, IOccurrenceRepo};
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use jubilee_domain::{EventOccurrence, OccurrenceStatus, ID};

pub struct InMemoryOccurrenceRepo {
    occurrences: std::sync::Mutex<Vec<EventOccurrence>>,
}

impl InMemoryOccurrenceRepo {
    pub fn new() -> Self {
        Self {
            occurrences: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IOccurrenceRepo for InMemoryOccurrenceRepo {
    async fn insert(&self, occurrence: &EventOccurrence) -> anyhow::Result<()> {
        insert(occurrence, &self.occurrences);
        Ok(())
    }

    async fn find(&self, occurrence_id: &ID) -> Option<EventOccurrence> {
        find(occurrence_id, &self.occurrences)
    }

    async fn find_by_event(&self, event_id: &ID) -> Option<EventOccurrence> {
        find_by(&self.occurrences, |o| o.event_id == *event_id)
            .into_iter()
            .next()
    }

    async fn find_due_at(&self, instant: i64) -> anyhow::Result<Vec<EventOccurrence>> {
        let minute_start = minute_floor(instant);
        let minute_end = minute_start + 60 * 1000;
        let res = find_by(&self.occurrences, |o| {
            o.status == OccurrenceStatus::Default
                && o.scheduled_at >= minute_start
                && o.scheduled_at < minute_end
        });
        Ok(res)
    }

    async fn update_status(&self, occurrence_id: &ID, status: OccurrenceStatus) -> bool {
        update_one(occurrence_id, &self.occurrences, |o| o.status = status)
    }

    async fn delete(&self, occurrence_id: &ID) -> Option<EventOccurrence> {
        delete(occurrence_id, &self.occurrences)
    }

    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult {
        delete_by(&self.occurrences, |o| o.event_id == *event_id)
    }
}
