use super::IMessageRepo;
use crate::repos::shared::repo::DeleteResult;
use jubilee_domain::{
    EventMessage, MessageActivity, MessageKind, MessageSendResult, ID, RETRYABLE_STATUS_CODES,
};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresMessageRepo {
    pool: PgPool,
}

impl PostgresMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn kind_to_str(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Preview => "preview",
        MessageKind::Event => "event",
    }
}

fn kind_from_str(kind: &str) -> MessageKind {
    match kind {
        "preview" => MessageKind::Preview,
        _ => MessageKind::Event,
    }
}

#[derive(Debug, FromRow)]
struct MessageRaw {
    message_uid: Uuid,
    occurrence_uid: Uuid,
    event_uid: Uuid,
    kind: String,
    activity: Json<MessageActivity>,
    status_code: Option<i32>,
    response_body: Option<String>,
    attempted_at: Option<i64>,
    expire_at: i64,
}

impl Into<EventMessage> for MessageRaw {
    fn into(self) -> EventMessage {
        let send_result = match (self.status_code, self.attempted_at) {
            (Some(status_code), Some(attempted_at)) => Some(MessageSendResult {
                status_code: status_code as u16,
                response_body: self.response_body.unwrap_or_default(),
                attempted_at,
            }),
            _ => None,
        };
        EventMessage {
            id: self.message_uid.into(),
            occurrence_id: self.occurrence_uid.into(),
            event_id: self.event_uid.into(),
            kind: kind_from_str(&self.kind),
            activity: self.activity.0,
            send_result,
            expire_at: self.expire_at,
        }
    }
}

#[async_trait::async_trait]
impl IMessageRepo for PostgresMessageRepo {
    async fn insert(&self, message: &EventMessage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO event_messages
            (message_uid, occurrence_uid, event_uid, kind, activity, status_code, response_body, attempted_at, expire_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(message.id.inner_ref())
        .bind(message.occurrence_id.inner_ref())
        .bind(message.event_id.inner_ref())
        .bind(kind_to_str(message.kind))
        .bind(Json(&message.activity))
        .bind(message.send_result.as_ref().map(|r| r.status_code as i32))
        .bind(message.send_result.as_ref().map(|r| r.response_body.clone()))
        .bind(message.send_result.as_ref().map(|r| r.attempted_at))
        .bind(message.expire_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, message: &EventMessage) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE event_messages SET
                status_code = $2,
                response_body = $3,
                attempted_at = $4
            WHERE message_uid = $1
            "#,
        )
        .bind(message.id.inner_ref())
        .bind(message.send_result.as_ref().map(|r| r.status_code as i32))
        .bind(message.send_result.as_ref().map(|r| r.response_body.clone()))
        .bind(message.send_result.as_ref().map(|r| r.attempted_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, message_id: &ID) -> Option<EventMessage> {
        sqlx::query_as::<_, MessageRaw>(
            r#"
            SELECT * FROM event_messages
            WHERE message_uid = $1
            "#,
        )
        .bind(message_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|m| m.into())
    }

    async fn find_by_occurrence(&self, occurrence_id: &ID) -> Vec<EventMessage> {
        sqlx::query_as::<_, MessageRaw>(
            r#"
            SELECT * FROM event_messages
            WHERE occurrence_uid = $1
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.into())
        .collect()
    }

    async fn find_retryable(&self) -> anyhow::Result<Vec<EventMessage>> {
        let codes = RETRYABLE_STATUS_CODES
            .iter()
            .map(|code| *code as i32)
            .collect::<Vec<_>>();
        let messages = sqlx::query_as::<_, MessageRaw>(
            r#"
            SELECT * FROM event_messages
            WHERE status_code = ANY($1)
            "#,
        )
        .bind(&codes)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages.into_iter().map(|m| m.into()).collect())
    }

    async fn delete_expired(&self, now: i64) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM event_messages
            WHERE expire_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() as i64)
        .unwrap_or(0);
        DeleteResult { deleted_count }
    }

    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM event_messages
            WHERE event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() as i64)
        .unwrap_or(0);
        DeleteResult { deleted_count }
    }
}
