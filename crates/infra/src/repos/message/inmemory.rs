use super::IMessageRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use jubilee_domain::{EventMessage, ID, RETRYABLE_STATUS_CODES};

pub struct InMemoryMessageRepo {
    messages: std::sync::Mutex<Vec<EventMessage>>,
}

impl InMemoryMessageRepo {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMessageRepo for InMemoryMessageRepo {
    async fn insert(&self, message: &EventMessage) -> anyhow::Result<()> {
        insert(message, &self.messages);
        Ok(())
    }

    async fn save(&self, message: &EventMessage) -> anyhow::Result<()> {
        save(message, &self.messages);
        Ok(())
    }

    async fn find(&self, message_id: &ID) -> Option<EventMessage> {
        find(message_id, &self.messages)
    }

    async fn find_by_occurrence(&self, occurrence_id: &ID) -> Vec<EventMessage> {
        find_by(&self.messages, |m| m.occurrence_id == *occurrence_id)
    }

    async fn find_retryable(&self) -> anyhow::Result<Vec<EventMessage>> {
        let res = find_by(&self.messages, |m| match m.last_status_code() {
            Some(code) => RETRYABLE_STATUS_CODES.contains(&code),
            None => false,
        });
        Ok(res)
    }

    async fn delete_expired(&self, now: i64) -> DeleteResult {
        delete_by(&self.messages, |m| m.expire_at <= now)
    }

    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult {
        delete_by(&self.messages, |m| m.event_id == *event_id)
    }
}
