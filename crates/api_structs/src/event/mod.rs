use jubilee_domain::{CelebrationEvent, EventKind, ID};
use serde::{Deserialize, Serialize};

pub mod dtos {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CelebrationEventDTO {
        pub id: ID,
        pub owner_user_id: ID,
        pub kind: EventKind,
        pub title: String,
        pub message: String,
        pub image_url: String,
        /// `year-month-day`, the year only matters for display
        pub date: String,
        pub time_zone: String,
        pub team_ids: Vec<ID>,
    }

    impl CelebrationEventDTO {
        pub fn new(event: &CelebrationEvent) -> Self {
            Self {
                id: event.id.clone(),
                owner_user_id: event.owner_user_id.clone(),
                kind: event.kind,
                title: event.title.clone(),
                message: event.message.clone(),
                image_url: event.image_url.clone(),
                date: event.date.to_string(),
                time_zone: event.time_zone.name().to_string(),
                team_ids: event.team_ids.clone(),
            }
        }
    }
}

pub mod create_event {
    use super::*;
    use dtos::CelebrationEventDTO;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub owner_user_id: ID,
        pub kind: EventKind,
        pub title: String,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub image_url: String,
        pub date: String,
        pub time_zone: String,
        #[serde(default)]
        pub team_ids: Vec<ID>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: CelebrationEventDTO,
    }

    impl APIResponse {
        pub fn new(event: &CelebrationEvent) -> Self {
            Self {
                event: CelebrationEventDTO::new(event),
            }
        }
    }
}

pub mod get_event {
    use super::*;
    use dtos::CelebrationEventDTO;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: CelebrationEventDTO,
    }

    impl APIResponse {
        pub fn new(event: &CelebrationEvent) -> Self {
            Self {
                event: CelebrationEventDTO::new(event),
            }
        }
    }
}

pub mod get_events_by_owner {
    use super::*;
    use dtos::CelebrationEventDTO;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<CelebrationEventDTO>,
    }

    impl APIResponse {
        pub fn new(events: &[CelebrationEvent]) -> Self {
            Self {
                events: events.iter().map(CelebrationEventDTO::new).collect(),
            }
        }
    }
}

pub mod update_event {
    use super::*;
    use dtos::CelebrationEventDTO;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub kind: Option<EventKind>,
        pub title: Option<String>,
        pub message: Option<String>,
        pub image_url: Option<String>,
        pub date: Option<String>,
        pub time_zone: Option<String>,
        pub team_ids: Option<Vec<ID>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: CelebrationEventDTO,
    }

    impl APIResponse {
        pub fn new(event: &CelebrationEvent) -> Self {
            Self {
                event: CelebrationEventDTO::new(event),
            }
        }
    }
}

pub mod delete_event {
    use super::*;
    use dtos::CelebrationEventDTO;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: CelebrationEventDTO,
    }

    impl APIResponse {
        pub fn new(event: &CelebrationEvent) -> Self {
            Self {
                event: CelebrationEventDTO::new(event),
            }
        }
    }
}

pub mod skip_event {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub skipped: bool,
    }
}
