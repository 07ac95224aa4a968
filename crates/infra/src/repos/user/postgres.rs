use super::IUserRepo;
use jubilee_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    chat_id: String,
    conversation_id: Option<String>,
}

impl Into<User> for UserRaw {
    fn into(self) -> User {
        User {
            id: self.user_uid.into(),
            name: self.name,
            chat_id: self.chat_id,
            conversation_id: self.conversation_id,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (user_uid, name, chat_id, conversation_id)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.chat_id)
        .bind(&user.conversation_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                chat_id = $3,
                conversation_id = $4
            WHERE user_uid = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.chat_id)
        .bind(&user.conversation_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|u| u.into())
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let ids = user_ids.iter().map(|id| *id.inner_ref()).collect::<Vec<_>>();
        let users = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE user_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            DELETE FROM users
            WHERE user_uid = $1
            RETURNING *
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|u| u.into())
    }
}
