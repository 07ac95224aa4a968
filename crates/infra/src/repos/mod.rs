mod event;
mod membership;
mod message;
mod occurrence;
mod shared;
mod team;
mod user;

pub use event::IEventRepo;
use event::{InMemoryEventRepo, PostgresEventRepo};
pub use membership::IMembershipRepo;
use membership::{InMemoryMembershipRepo, PostgresMembershipRepo};
pub use message::IMessageRepo;
use message::{InMemoryMessageRepo, PostgresMessageRepo};
pub use occurrence::IOccurrenceRepo;
use occurrence::{InMemoryOccurrenceRepo, PostgresOccurrenceRepo};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use team::ITeamRepo;
use team::{InMemoryTeamRepo, PostgresTeamRepo};
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub occurrences: Arc<dyn IOccurrenceRepo>,
    pub messages: Arc<dyn IMessageRepo>,
    pub teams: Arc<dyn ITeamRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub memberships: Arc<dyn IMembershipRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            occurrences: Arc::new(PostgresOccurrenceRepo::new(pool.clone())),
            messages: Arc::new(PostgresMessageRepo::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            memberships: Arc::new(PostgresMembershipRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepo::new()),
            occurrences: Arc::new(InMemoryOccurrenceRepo::new()),
            messages: Arc::new(InMemoryMessageRepo::new()),
            teams: Arc::new(InMemoryTeamRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            memberships: Arc::new(InMemoryMembershipRepo::new()),
        }
    }
}
