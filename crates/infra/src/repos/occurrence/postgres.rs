use super::{minute_floor, IOccurrenceRepo};
use crate::repos::shared::repo::DeleteResult;
use jubilee_domain::{EventOccurrence, OccurrenceStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresOccurrenceRepo {
    pool: PgPool,
}

impl PostgresOccurrenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_to_str(status: OccurrenceStatus) -> &'static str {
    match status {
        OccurrenceStatus::Default => "default",
        OccurrenceStatus::Skipped => "skipped",
    }
}

fn status_from_str(status: &str) -> OccurrenceStatus {
    match status {
        "skipped" => OccurrenceStatus::Skipped,
        _ => OccurrenceStatus::Default,
    }
}

#[derive(Debug, FromRow)]
struct OccurrenceRaw {
    occurrence_uid: Uuid,
    event_uid: Uuid,
    scheduled_at: i64,
    status: String,
}

impl Into<EventOccurrence> for OccurrenceRaw {
    fn into(self) -> EventOccurrence {
        EventOccurrence {
            id: self.occurrence_uid.into(),
            event_id: self.event_uid.into(),
            scheduled_at: self.scheduled_at,
            status: status_from_str(&self.status),
        }
    }
}

#[async_trait::async_trait]
impl IOccurrenceRepo for PostgresOccurrenceRepo {
    async fn insert(&self, occurrence: &EventOccurrence) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO occurrences
            (occurrence_uid, event_uid, scheduled_at, status)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(occurrence.id.inner_ref())
        .bind(occurrence.event_id.inner_ref())
        .bind(occurrence.scheduled_at)
        .bind(status_to_str(occurrence.status))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, occurrence_id: &ID) -> Option<EventOccurrence> {
        sqlx::query_as::<_, OccurrenceRaw>(
            r#"
            SELECT * FROM occurrences
            WHERE occurrence_uid = $1
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|o| o.into())
    }

    async fn find_by_event(&self, event_id: &ID) -> Option<EventOccurrence> {
        sqlx::query_as::<_, OccurrenceRaw>(
            r#"
            SELECT * FROM occurrences
            WHERE event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|o| o.into())
    }

    async fn find_due_at(&self, instant: i64) -> anyhow::Result<Vec<EventOccurrence>> {
        let minute_start = minute_floor(instant);
        let minute_end = minute_start + 60 * 1000;
        let occurrences = sqlx::query_as::<_, OccurrenceRaw>(
            r#"
            SELECT * FROM occurrences
            WHERE status = 'default'
            AND scheduled_at >= $1 AND scheduled_at < $2
            "#,
        )
        .bind(minute_start)
        .bind(minute_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(occurrences.into_iter().map(|o| o.into()).collect())
    }

    async fn update_status(&self, occurrence_id: &ID, status: OccurrenceStatus) -> bool {
        sqlx::query(
            r#"
            UPDATE occurrences SET status = $2
            WHERE occurrence_uid = $1
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .bind(status_to_str(status))
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() > 0)
        .unwrap_or(false)
    }

    async fn delete(&self, occurrence_id: &ID) -> Option<EventOccurrence> {
        sqlx::query_as::<_, OccurrenceRaw>(
            r#"
            DELETE FROM occurrences
            WHERE occurrence_uid = $1
            RETURNING *
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|o| o.into())
    }

    async fn delete_by_event(&self, event_id: &ID) -> DeleteResult {
        let deleted_count = sqlx::query(
            r#"
            DELETE FROM occurrences
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
