use super::{ChatActivity, IChatTransport};
use jubilee_domain::DeliveryOutcome;
use tracing::warn;

/// Sends activities to the bot connector service over HTTP
pub struct BotConnectorTransport {
    client: reqwest::Client,
    base_url: String,
}

impl BotConnectorTransport {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl IChatTransport for BotConnectorTransport {
    async fn send_to_conversation(
        &self,
        conversation_id: &str,
        activity: &ChatActivity,
    ) -> DeliveryOutcome {
        let url = format!(
            "{}/v3/conversations/{}/activities",
            self.base_url, conversation_id
        );

        match self.client.post(&url).json(activity).send().await {
            Ok(res) if res.status().is_success() => DeliveryOutcome::Sent,
            Ok(res) => {
                let status = res.status().as_u16();
                let body = res.text().await.unwrap_or_default();
                DeliveryOutcome::Failed { status, body }
            }
            Err(e) => {
                // No response at all, classify as transient
                warn!("Transport error sending to conversation {}: {:?}", conversation_id, e);
                DeliveryOutcome::Failed {
                    status: 503,
                    body: e.to_string(),
                }
            }
        }
    }
}
