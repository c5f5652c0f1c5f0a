//! Repository implementations for database operations.

pub mod invitation;
pub mod join_request;
pub mod notification;
pub mod profile;
pub mod team;

pub use invitation::InvitationRepository;
pub use join_request::JoinRequestRepository;
pub use notification::{NotificationRepository, PgNotifier};
pub use profile::ProfileRepository;
pub use team::TeamRepository;
