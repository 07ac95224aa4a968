use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use jubilee_domain::{CelebrationEvent, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<CelebrationEvent>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &CelebrationEvent) -> anyhow::Result<()> {
        insert(e, &self.events);
        Ok(())
    }

    async fn save(&self, e: &CelebrationEvent) -> anyhow::Result<()> {
        save(e, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<CelebrationEvent> {
        find(event_id, &self.events)
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<CelebrationEvent>> {
        let res = find_by(&self.events, |e| event_ids.contains(&e.id));
        Ok(res)
    }

    async fn find_by_owner(&self, owner_user_id: &ID) -> Vec<CelebrationEvent> {
        find_by(&self.events, |e| e.owner_user_id == *owner_user_id)
    }

    async fn find_by_month_day(
        &self,
        month_days: &[(u32, u32)],
    ) -> anyhow::Result<Vec<CelebrationEvent>> {
        let res = find_by(&self.events, |e| {
            month_days.contains(&(e.event_month(), e.event_day()))
        });
        Ok(res)
    }

    async fn delete(&self, event_id: &ID) -> Option<CelebrationEvent> {
        delete(event_id, &self.events)
    }
}
