mod inmemory;
mod postgres;

pub use inmemory::InMemoryEventRepo;
use jubilee_domain::{CelebrationEvent, ID};
pub use postgres::PostgresEventRepo;

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &CelebrationEvent) -> anyhow::Result<()>;
    async fn save(&self, e: &CelebrationEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<CelebrationEvent>;
    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<CelebrationEvent>>;
    /// Events partitioned by their owner
    async fn find_by_owner(&self, owner_user_id: &ID) -> Vec<CelebrationEvent>;
    /// Events whose recurring (month, day) matches any pair of the window
    async fn find_by_month_day(&self, month_days: &[(u32, u32)])
        -> anyhow::Result<Vec<CelebrationEvent>>;
    async fn delete(&self, event_id: &ID) -> Option<CelebrationEvent>;
}
