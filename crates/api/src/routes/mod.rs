//! HTTP route handlers.

pub mod health;
pub mod invitations;
pub mod join_requests;
pub mod teams;

use serde::Serialize;

/// Success envelope: `{ "success": true, ...result }`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionSuccess<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub result: T,
}

impl<T: Serialize> ActionSuccess<T> {
    pub fn new(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        team_id: u32,
    }

    #[test]
    fn test_action_success_envelope() {
        let envelope = ActionSuccess::new(Payload { team_id: 7 });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["team_id"], 7);
    }
}
