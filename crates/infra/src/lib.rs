mod config;
mod repos;
mod system;
mod transport;

pub use config::Config;
pub use repos::{
    DeleteResult, IEventRepo, IMembershipRepo, IMessageRepo, IOccurrenceRepo, ITeamRepo, IUserRepo,
    Repos,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
pub use transport::{
    AttachmentLayout, BotConnectorTransport, ChatActivity, HeroCard, IChatTransport, Mention,
    StubChatTransport,
};

#[derive(Clone)]
pub struct JubileeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub transport: Arc<dyn IChatTransport>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl JubileeContext {
    async fn create(params: ContextParams) -> Self {
        let config = Config::new();
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let transport = Arc::new(BotConnectorTransport::new(config.bot_service_url.clone()));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            transport,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> JubileeContext {
    JubileeContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context backed by in-memory repos and a stub transport, for tests. The
/// stub handle is returned alongside so tests can script outcomes and
/// inspect sent activities.
pub fn setup_context_inmemory() -> (JubileeContext, Arc<StubChatTransport>) {
    let transport = Arc::new(StubChatTransport::new());
    let ctx = JubileeContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        transport: transport.clone(),
    };
    (ctx, transport)
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
