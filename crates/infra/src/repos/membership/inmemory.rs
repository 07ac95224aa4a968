use super::IMembershipRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use jubilee_domain::{TeamMembership, ID};

pub struct InMemoryMembershipRepo {
    memberships: std::sync::Mutex<Vec<TeamMembership>>,
}

impl InMemoryMembershipRepo {
    pub fn new() -> Self {
        Self {
            memberships: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMembershipRepo for InMemoryMembershipRepo {
    async fn insert(&self, membership: &TeamMembership) -> anyhow::Result<()> {
        insert(membership, &self.memberships);
        Ok(())
    }

    async fn find_by_team(&self, team_id: &ID) -> Vec<TeamMembership> {
        find_by(&self.memberships, |m| m.team_id == *team_id)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<TeamMembership> {
        find_by(&self.memberships, |m| m.user_id == *user_id)
    }

    async fn delete(&self, user_id: &ID, team_id: &ID) -> DeleteResult {
        delete_by(&self.memberships, |m| {
            m.user_id == *user_id && m.team_id == *team_id
        })
    }

    async fn delete_by_team(&self, team_id: &ID) -> DeleteResult {
        delete_by(&self.memberships, |m| m.team_id == *team_id)
    }

    async fn delete_by_user(&self, user_id: &ID) -> DeleteResult {
        delete_by(&self.memberships, |m| m.user_id == *user_id)
    }
}
