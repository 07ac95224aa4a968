use super::ITeamRepo;
use crate::repos::shared::inmemory_repo::*;
use jubilee_domain::{Team, ID};

pub struct InMemoryTeamRepo {
    teams: std::sync::Mutex<Vec<Team>>,
}

impl InMemoryTeamRepo {
    pub fn new() -> Self {
        Self {
            teams: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITeamRepo for InMemoryTeamRepo {
    async fn insert(&self, team: &Team) -> anyhow::Result<()> {
        insert(team, &self.teams);
        Ok(())
    }

    async fn save(&self, team: &Team) -> anyhow::Result<()> {
        save(team, &self.teams);
        Ok(())
    }

    async fn find(&self, team_id: &ID) -> Option<Team> {
        find(team_id, &self.teams)
    }

    async fn find_many(&self, team_ids: &[ID]) -> anyhow::Result<Vec<Team>> {
        let res = find_by(&self.teams, |t| team_ids.contains(&t.id));
        Ok(res)
    }

    async fn delete(&self, team_id: &ID) -> Option<Team> {
        delete(team_id, &self.teams)
    }
}
