use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A team the bot is installed in. Owned by the membership subsystem, read
/// by the notification pipeline to resolve destinations and deleted by the
/// delivery engine when the bot turns out to be uninstalled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: ID,
    pub name: String,
    /// Channel conversation the celebration cards are posted to
    pub conversation_id: String,
}

impl Entity for Team {
    fn id(&self) -> &ID {
        &self.id
    }
}
