use super::IMembershipRepo;
use crate::repos::shared::repo::DeleteResult;
use jubilee_domain::{TeamMembership, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresMembershipRepo {
    pool: PgPool,
}

impl PostgresMembershipRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MembershipRaw {
    user_uid: Uuid,
    team_uid: Uuid,
}

impl Into<TeamMembership> for MembershipRaw {
    fn into(self) -> TeamMembership {
        TeamMembership {
            user_id: self.user_uid.into(),
            team_id: self.team_uid.into(),
        }
    }
}

#[async_trait::async_trait]
impl IMembershipRepo for PostgresMembershipRepo {
    async fn insert(&self, membership: &TeamMembership) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO team_memberships
            (user_uid, team_uid)
            VALUES($1, $2)
            "#,
        )
        .bind(membership.user_id.inner_ref())
        .bind(membership.team_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_team(&self, team_id: &ID) -> Vec<TeamMembership> {
        sqlx::query_as::<_, MembershipRaw>(
            r#"
            SELECT * FROM team_memberships
            WHERE team_uid = $1
            "#,
        )
        .bind(team_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.into())
        .collect()
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<TeamMembership> {
        sqlx::query_as::<_, MembershipRaw>(
            r#"
            SELECT * FROM team_memberships
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.into())
        .collect()
    }

    async fn delete(&self, user_id: &ID, team_id: &ID) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM team_memberships
            WHERE user_uid = $1 AND team_uid = $2
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(team_id.inner_ref())
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() as i64)
        .unwrap_or(0);
        DeleteResult { deleted_count }
    }

    async fn delete_by_team(&self, team_id: &ID) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM team_memberships
            WHERE team_uid = $1
            "#,
        )
        .bind(team_id.inner_ref())
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() as i64)
        .unwrap_or(0);
        DeleteResult { deleted_count }
    }

    async fn delete_by_user(&self, user_id: &ID) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM team_memberships
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() as i64)
        .unwrap_or(0);
        DeleteResult { deleted_count }
    }
}
