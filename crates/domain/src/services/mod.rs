//! Domain services for the Atelier teams backend.

pub mod notification;

pub use notification::{
    NotificationKind, Notifier, NullNotifier, RecordingNotifier, SentNotification,
};
