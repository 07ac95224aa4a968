use super::{ChatActivity, IChatTransport};
use jubilee_domain::DeliveryOutcome;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport used in tests: records every activity and plays back scripted
/// outcomes, falling back to a configurable default when the script is
/// exhausted.
pub struct StubChatTransport {
    default_outcome: Mutex<DeliveryOutcome>,
    scripted: Mutex<VecDeque<DeliveryOutcome>>,
    sent: Mutex<Vec<(String, ChatActivity)>>,
}

impl StubChatTransport {
    pub fn new() -> Self {
        Self {
            default_outcome: Mutex::new(DeliveryOutcome::Sent),
            scripted: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_default_outcome(&self, outcome: DeliveryOutcome) {
        *self.default_outcome.lock().unwrap() = outcome;
    }

    /// Queue an outcome for the next unscripted send
    pub fn script_outcome(&self, outcome: DeliveryOutcome) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    /// Every (conversation id, activity) pair sent so far
    pub fn sent(&self) -> Vec<(String, ChatActivity)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for StubChatTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IChatTransport for StubChatTransport {
    async fn send_to_conversation(
        &self,
        conversation_id: &str,
        activity: &ChatActivity,
    ) -> DeliveryOutcome {
        self.sent
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), activity.clone()));

        match self.scripted.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => self.default_outcome.lock().unwrap().clone(),
        }
    }
}
