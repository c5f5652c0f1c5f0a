//! Notification capability.
//!
//! Team actions emit best-effort notifications: a failure to record one is
//! logged and never fails the primary action. The core calls the [`Notifier`]
//! trait; the persistence layer provides the database-backed implementation.

use serde_json::Value;
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TeamCreated,
    TeamInvitation,
    InvitationAccepted,
    InvitationDeclined,
    JoinRequestReceived,
    JoinRequestApproved,
    JoinRequestRejected,
    LeadershipTransferred,
    RemovedFromTeam,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TeamCreated => "team_created",
            NotificationKind::TeamInvitation => "team_invitation",
            NotificationKind::InvitationAccepted => "invitation_accepted",
            NotificationKind::InvitationDeclined => "invitation_declined",
            NotificationKind::JoinRequestReceived => "join_request_received",
            NotificationKind::JoinRequestApproved => "join_request_approved",
            NotificationKind::JoinRequestRejected => "join_request_rejected",
            NotificationKind::LeadershipTransferred => "leadership_transferred",
            NotificationKind::RemovedFromTeam => "removed_from_team",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability interface for recording user notifications.
///
/// Implementations must be fire-and-forget: they log failures internally and
/// never propagate them to the caller.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        metadata: Option<Value>,
    );
}

/// Notifier that drops everything. Used when the notification store is
/// disabled.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

#[async_trait::async_trait]
impl Notifier for NullNotifier {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        _message: &str,
        _metadata: Option<Value>,
    ) {
        tracing::debug!(
            user_id = %user_id,
            kind = %kind,
            title = %title,
            "Notification dropped (null notifier)"
        );
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub metadata: Option<Value>,
}

/// Notifier that records every call in memory. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        metadata: Option<Value>,
    ) {
        self.sent
            .lock()
            .expect("notifier lock poisoned")
            .push(SentNotification {
                user_id,
                kind,
                title: title.to_string(),
                message: message.to_string(),
                metadata,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(NotificationKind::TeamCreated.as_str(), "team_created");
        assert_eq!(
            NotificationKind::JoinRequestApproved.as_str(),
            "join_request_approved"
        );
        assert_eq!(
            NotificationKind::LeadershipTransferred.to_string(),
            "leadership_transferred"
        );
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&NotificationKind::TeamInvitation).unwrap();
        assert_eq!(json, "\"team_invitation\"");
    }

    #[tokio::test]
    async fn test_recording_notifier_captures_calls() {
        let notifier = RecordingNotifier::new();
        let user_id = Uuid::new_v4();

        notifier
            .notify(
                user_id,
                NotificationKind::TeamCreated,
                "Team Created",
                "Your team is live",
                Some(serde_json::json!({"team_id": "x"})),
            )
            .await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, user_id);
        assert_eq!(sent[0].kind, NotificationKind::TeamCreated);
        assert_eq!(sent[0].title, "Team Created");
        assert!(sent[0].metadata.is_some());
    }

    #[tokio::test]
    async fn test_null_notifier_is_silent() {
        let notifier = NullNotifier;
        notifier
            .notify(
                Uuid::new_v4(),
                NotificationKind::RemovedFromTeam,
                "Removed",
                "msg",
                None,
            )
            .await;
    }
}
