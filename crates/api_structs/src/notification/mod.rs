use serde::{Deserialize, Serialize};

/// Shared by all trigger endpoints. The caller can pin the reference instant,
/// which is what the scheduled trigger does to stay aligned with its own
/// clock, otherwise the server clock is used.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// ISO 8601 instant, e.g. "2024-06-03T10:00:00Z"
    pub current_date_time: Option<String>,
}

pub mod send_upcoming_previews {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// New occurrences resolved for events entering the window
        pub occurrences_created: usize,
        pub previews_sent: usize,
    }
}

pub mod send_event_cards {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub occurrences_due: usize,
        pub cards_sent: usize,
        pub cards_failed: usize,
    }
}

pub mod retry_failed_messages {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub expired_purged: i64,
        pub retried: usize,
        pub delivered: usize,
    }
}
