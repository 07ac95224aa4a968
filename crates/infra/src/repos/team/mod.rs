mod inmemory;
mod postgres;

pub use inmemory::InMemoryTeamRepo;
use jubilee_domain::{Team, ID};
pub use postgres::PostgresTeamRepo;

#[async_trait::async_trait]
pub trait ITeamRepo: Send + Sync {
    async fn insert(&self, team: &Team) -> anyhow::Result<()>;
    async fn save(&self, team: &Team) -> anyhow::Result<()>;
    async fn find(&self, team_id: &ID) -> Option<Team>;
    async fn find_many(&self, team_ids: &[ID]) -> anyhow::Result<Vec<Team>>;
    async fn delete(&self, team_id: &ID) -> Option<Team>;
}
