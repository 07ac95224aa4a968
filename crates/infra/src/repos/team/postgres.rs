use super::ITeamRepo;
use jubilee_domain::{Team, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresTeamRepo {
    pool: PgPool,
}

impl PostgresTeamRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TeamRaw {
    team_uid: Uuid,
    name: String,
    conversation_id: String,
}

impl Into<Team> for TeamRaw {
    fn into(self) -> Team {
        Team {
            id: self.team_uid.into(),
            name: self.name,
            conversation_id: self.conversation_id,
        }
    }
}

#[async_trait::async_trait]
impl ITeamRepo for PostgresTeamRepo {
    async fn insert(&self, team: &Team) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO teams
            (team_uid, name, conversation_id)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(team.id.inner_ref())
        .bind(&team.name)
        .bind(&team.conversation_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, team: &Team) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE teams SET
                name = $2,
                conversation_id = $3
            WHERE team_uid = $1
            "#,
        )
        .bind(team.id.inner_ref())
        .bind(&team.name)
        .bind(&team.conversation_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, team_id: &ID) -> Option<Team> {
        sqlx::query_as::<_, TeamRaw>(
            r#"
            SELECT * FROM teams
            WHERE team_uid = $1
            "#,
        )
        .bind(team_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|t| t.into())
    }

    async fn find_many(&self, team_ids: &[ID]) -> anyhow::Result<Vec<Team>> {
        let ids = team_ids.iter().map(|id| *id.inner_ref()).collect::<Vec<_>>();
        let teams = sqlx::query_as::<_, TeamRaw>(
            r#"
            SELECT * FROM teams
            WHERE team_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams.into_iter().map(|t| t.into()).collect())
    }

    async fn delete(&self, team_id: &ID) -> Option<Team> {
        sqlx::query_as::<_, TeamRaw>(
            r#"
            DELETE FROM teams
            WHERE team_uid = $1
            RETURNING *
            "#,
        )
        .bind(team_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|t| t.into())
    }
}
