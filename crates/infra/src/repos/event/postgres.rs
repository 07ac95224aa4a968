use super::IEventRepo;
use jubilee_domain::{CelebrationEvent, EventKind, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::warn;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn kind_to_str(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Birthday => "birthday",
        EventKind::Anniversary => "anniversary",
        EventKind::Other => "other",
    }
}

fn kind_from_str(kind: &str) -> EventKind {
    match kind {
        "birthday" => EventKind::Birthday,
        "anniversary" => EventKind::Anniversary,
        _ => EventKind::Other,
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    owner_uid: Uuid,
    kind: String,
    title: String,
    message: String,
    image_url: String,
    event_date: chrono::NaiveDate,
    time_zone: String,
    team_uids: Json<Vec<ID>>,
}

impl Into<CelebrationEvent> for EventRaw {
    fn into(self) -> CelebrationEvent {
        let time_zone = self.time_zone.parse().unwrap_or_else(|_| {
            warn!("Stored timezone {} no longer parses, using UTC", self.time_zone);
            chrono_tz::UTC
        });
        CelebrationEvent {
            id: self.event_uid.into(),
            owner_user_id: self.owner_uid.into(),
            kind: kind_from_str(&self.kind),
            title: self.title,
            message: self.message,
            image_url: self.image_url,
            date: self.event_date,
            time_zone,
            team_ids: self.team_uids.0,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &CelebrationEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events
            (event_uid, owner_uid, kind, title, message, image_url, event_date, event_month, event_day, time_zone, team_uids)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(e.owner_user_id.inner_ref())
        .bind(kind_to_str(e.kind))
        .bind(&e.title)
        .bind(&e.message)
        .bind(&e.image_url)
        .bind(e.date)
        .bind(e.event_month() as i32)
        .bind(e.event_day() as i32)
        .bind(e.time_zone.name())
        .bind(Json(&e.team_ids))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, e: &CelebrationEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events SET
                kind = $2,
                title = $3,
                message = $4,
                image_url = $5,
                event_date = $6,
                event_month = $7,
                event_day = $8,
                time_zone = $9,
                team_uids = $10
            WHERE event_uid = $1
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(kind_to_str(e.kind))
        .bind(&e.title)
        .bind(&e.message)
        .bind(&e.image_url)
        .bind(e.date)
        .bind(e.event_month() as i32)
        .bind(e.event_day() as i32)
        .bind(e.time_zone.name())
        .bind(Json(&e.team_ids))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<CelebrationEvent> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|e| e.into())
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<CelebrationEvent>> {
        let ids = event_ids.iter().map(|id| *id.inner_ref()).collect::<Vec<_>>();
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE event_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    async fn find_by_owner(&self, owner_user_id: &ID) -> Vec<CelebrationEvent> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events
            WHERE owner_uid = $1
            "#,
        )
        .bind(owner_user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.into())
        .collect()
    }

    async fn find_by_month_day(
        &self,
        month_days: &[(u32, u32)],
    ) -> anyhow::Result<Vec<CelebrationEvent>> {
        if month_days.is_empty() {
            return Ok(Vec::new());
        }

        // The window is a small set of integer pairs, composed directly into
        // the query the same way it is built against the document store
        let predicate = month_days
            .iter()
            .map(|(month, day)| format!("(event_month = {} AND event_day = {})", month, day))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!("SELECT * FROM events WHERE {}", predicate);

        let events = sqlx::query_as::<_, EventRaw>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    async fn delete(&self, event_id: &ID) -> Option<CelebrationEvent> {
        sqlx::query_as::<_, EventRaw>(
            r#"
            DELETE FROM events
            WHERE event_uid = $1
            RETURNING *
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|e| e.into())
    }
}
