mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryMembershipRepo;
use jubilee_domain::{TeamMembership, ID};
pub use postgres::PostgresMembershipRepo;

#[async_trait::async_trait]
pub trait IMembershipRepo: Send + Sync {
    async fn insert(&self, membership: &TeamMembership) -> anyhow::Result<()>;
    async fn find_by_team(&self, team_id: &ID) -> Vec<TeamMembership>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<TeamMembership>;
    async fn delete(&self, user_id: &ID, team_id: &ID) -> DeleteResult;
    async fn delete_by_team(&self, team_id: &ID) -> DeleteResult;
    async fn delete_by_user(&self, user_id: &ID) -> DeleteResult;
}
