mod connector;
mod stub;

pub use connector::BotConnectorTransport;
use jubilee_domain::DeliveryOutcome;
use serde::{Deserialize, Serialize};
pub use stub::StubChatTransport;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentLayout {
    List,
    Carousel,
}

/// A single celebration card attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCard {
    pub title: String,
    pub text: String,
    pub image_url: String,
}

/// Mention entity attached to an activity, one per mentioned user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub text: String,
    pub mentioned_id: String,
    pub mentioned_name: String,
}

/// The outbound message shape the chat transport understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatActivity {
    pub text: String,
    pub attachment_layout: AttachmentLayout,
    pub attachments: Vec<HeroCard>,
    pub mentions: Vec<Mention>,
}

/// Outbound chat transport. Expected failures come back as a
/// `DeliveryOutcome` rather than an error, so callers classify on the
/// status code instead of on error types.
#[async_trait::async_trait]
pub trait IChatTransport: Send + Sync {
    async fn send_to_conversation(
        &self,
        conversation_id: &str,
        activity: &ChatActivity,
    ) -> DeliveryOutcome;
}
