pub mod event;
pub mod notification;
pub mod status;

pub use jubilee_domain as domain;
