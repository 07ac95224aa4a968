pub mod date;
mod event;
mod membership;
mod message;
mod occurrence;
mod shared;
mod team;
mod user;

pub use event::{CelebrationEvent, EventKind, MAX_EVENTS_PER_OWNER};
pub use membership::TeamMembership;
pub use message::{
    DeliveryOutcome, EventMessage, MessageActivity, MessageKind, MessageSendResult,
    RETRYABLE_STATUS_CODES,
};
pub use occurrence::{EventOccurrence, OccurrenceStatus};
pub use shared::entity::{Entity, ID};
pub use team::Team;
pub use user::User;
