use crate::shared::entity::{Entity, ID};
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Cap on the number of live events a single owner can hold
pub const MAX_EVENTS_PER_OWNER: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Birthday,
    Anniversary,
    Other,
}

/// A recurring personal event registered by a team member. Recurrence is
/// month/day based: the year of `date` is only kept for display, every year
/// with a matching month/day produces a new occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrationEvent {
    pub id: ID,
    pub owner_user_id: ID,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub image_url: String,
    pub date: NaiveDate,
    /// Timezone the post time-of-day is interpreted in
    pub time_zone: Tz,
    /// Teams the celebration card is posted to
    pub team_ids: Vec<ID>,
}

impl CelebrationEvent {
    pub fn event_month(&self) -> u32 {
        self.date.month()
    }

    pub fn event_day(&self) -> u32 {
        self.date.day()
    }
}

impl Entity for CelebrationEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}
