use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ID,
    pub name: String,
    /// Chat-platform id, used for mention entities
    pub chat_id: String,
    /// Personal conversation with the bot. Established by the membership
    /// subsystem on first contact, absent until then.
    pub conversation_id: Option<String>,
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
