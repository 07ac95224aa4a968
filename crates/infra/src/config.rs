use chrono::NaiveTime;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::warn;

/// Application configuration. Built once from the environment at startup
/// and handed to every component through the context.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How many days ahead of an occurrence the owner gets the reminder
    pub look_ahead_days: u32,
    /// Local time-of-day at which celebration cards are posted, interpreted
    /// in each event's timezone
    pub time_to_post: NaiveTime,
    /// More due events than this for one team get combined into carousels
    pub carousel_threshold: usize,
    /// Maximum number of cards in one carousel message
    pub carousel_cap: usize,
    /// Maximum delivery attempts per ledger row within one retry pass
    pub max_send_attempts: u32,
    /// Base for the exponential backoff between retry attempts
    pub retry_base_delay_ms: u64,
    /// Reminder ledger rows expire this many hours after the occurrence
    pub preview_expiry_hours: i64,
    /// Celebration-card ledger rows expire this many hours after the occurrence
    pub event_expiry_hours: i64,
    /// Base url of the outbound bot connector service
    pub bot_service_url: String,
}

fn env_or<T: FromStr + Debug>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {:?}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let time_to_post = match std::env::var("TIME_TO_POST_CELEBRATION") {
            Ok(value) => match NaiveTime::parse_from_str(&value, "%H:%M:%S") {
                Ok(time) => time,
                Err(_) => {
                    warn!(
                        "The given TIME_TO_POST_CELEBRATION: {} is not valid, falling back to 10:00:00.",
                        value
                    );
                    NaiveTime::from_hms(10, 0, 0)
                }
            },
            Err(_) => NaiveTime::from_hms(10, 0, 0),
        };

        Self {
            port: env_or("PORT", 5000),
            look_ahead_days: env_or("LOOK_AHEAD_DAYS", 3),
            time_to_post,
            carousel_threshold: env_or("CAROUSEL_THRESHOLD", 3),
            carousel_cap: env_or("CAROUSEL_CAP", 6),
            max_send_attempts: env_or("MAX_SEND_ATTEMPTS", 4),
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", 2000),
            preview_expiry_hours: env_or("PREVIEW_EXPIRY_HOURS", 24),
            event_expiry_hours: env_or("EVENT_EXPIRY_HOURS", 12),
            bot_service_url: std::env::var("BOT_SERVICE_URL")
                .unwrap_or_else(|_| "https://smba.trafficmanager.net/teams".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
