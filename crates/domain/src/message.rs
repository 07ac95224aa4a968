use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// HTTP-style status codes that classify a delivery failure as transient.
/// Ledger rows whose last attempt landed on one of these are picked up again
/// by the retry pass.
pub const RETRYABLE_STATUS_CODES: [u16; 12] =
    [429, 500, 501, 502, 503, 504, 505, 506, 507, 508, 510, 511];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// Advance reminder sent to the event owner
    Preview,
    /// Celebration card posted in a team
    Event,
}

/// Everything needed to re-render and re-send a celebration card without
/// querying the event again. Snapshotted into the ledger row at creation so
/// a retry is self-sufficient even after the event was edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActivity {
    pub event_id: ID,
    pub owner_user_id: ID,
    pub owner_name: String,
    /// Chat-platform id of the owner, used for mention entities
    pub owner_chat_id: String,
    /// Conversation the card is (re)sent to
    pub conversation_id: String,
    pub title: String,
    pub message: String,
    pub image_url: String,
    /// Only set for previews, which show the upcoming date
    pub event_date: Option<NaiveDate>,
}

/// Outcome of one attempt against the chat transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    Sent,
    Failed { status: u16, body: String },
}

impl DeliveryOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            DeliveryOutcome::Sent => 200,
            DeliveryOutcome::Failed { status, .. } => *status,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryOutcome::Sent => false,
            DeliveryOutcome::Failed { status, .. } => RETRYABLE_STATUS_CODES.contains(status),
        }
    }
}

/// Bookkeeping of the last delivery attempt for a ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendResult {
    pub status_code: u16,
    pub response_body: String,
    /// UTC timestamp in millis of the attempt
    pub attempted_at: i64,
}

impl MessageSendResult {
    pub fn from_outcome(outcome: &DeliveryOutcome, attempted_at: i64) -> Self {
        match outcome {
            DeliveryOutcome::Sent => Self {
                status_code: 200,
                response_body: "Successfully sent the message.".into(),
                attempted_at,
            },
            DeliveryOutcome::Failed { status, body } => Self {
                status_code: *status,
                response_body: body.clone(),
                attempted_at,
            },
        }
    }
}

/// One outbound-message intent plus its delivery bookkeeping. Owned by the
/// event it originated from but stored independently so partial failures can
/// be attributed and retried row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub id: ID,
    pub occurrence_id: ID,
    pub event_id: ID,
    pub kind: MessageKind,
    pub activity: MessageActivity,
    pub send_result: Option<MessageSendResult>,
    /// UTC timestamp in millis after which retries are abandoned
    pub expire_at: i64,
}

impl EventMessage {
    pub fn new(
        occurrence_id: ID,
        event_id: ID,
        kind: MessageKind,
        activity: MessageActivity,
        expire_at: i64,
    ) -> Self {
        Self {
            id: ID::new(),
            occurrence_id,
            event_id,
            kind,
            activity,
            send_result: None,
            expire_at,
        }
    }

    pub fn last_status_code(&self) -> Option<u16> {
        self.send_result.as_ref().map(|r| r.status_code)
    }
}

impl Entity for EventMessage {
    fn id(&self) -> &ID {
        &self.id
    }
}
