use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// Marks a user as a member of a team. Owned by the membership subsystem;
/// the delivery engine deletes these when a team is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    pub user_id: ID,
    pub team_id: ID,
}
