mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryMessageRepo;
use jubilee_domain::{EventMessage, ID};
pub use postgres::PostgresMessageRepo;

#[async_trait::async_trait]
pub trait IMessageRepo: Send + Sync {
    async fn insert(&self, message: &EventMessage) -> anyhow::Result<()>;
    /// Persists the latest send result for an already recorded message
    async fn save(&self, message: &EventMessage) -> anyhow::Result<()>;
    async fn find(&self, message_id: &ID) -> Option<EventMessage>;
    async fn find_by_occurrence(&self, occurrence_id: &ID) -> Vec<EventMessage>;
    /// Messages whose last delivery failed with a status worth retrying
    async fn find_retryable(&self) -> anyhow::Result<Vec<EventMessage>>;
    async fn delete_expired(&self, now: i64) -> DeleteResult;
    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult;
}
