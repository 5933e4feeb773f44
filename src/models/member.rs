use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the synthetic member standing for the person using this device.
pub const CURRENT_USER_ID: &str = "current-user";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Reference to an avatar image, empty when there is none
    #[serde(default)]
    pub avatar: String,
    pub initials: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub joined_at: Option<Timestamp>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Invited,
}

impl Member {
    /// The member every project is created by and every unassigned task falls back to.
    pub fn current_user() -> Self {
        Self {
            id: CURRENT_USER_ID.to_string(),
            name: String::from("You"),
            email: String::from("you@example.com"),
            avatar: String::new(),
            initials: String::from("YU"),
            role: String::from("Project Manager"),
            status: MemberStatus::Active,
            joined_at: None,
        }
    }

    /// Builds an invited member from an email address.
    ///
    /// The display name is the local part of the address and the initials are
    /// its first two characters, uppercased.
    pub fn invited(email: &str, role: &str, now: Timestamp) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let initials = email.chars().take(2).collect::<String>().to_uppercase();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.to_string(),
            avatar: String::new(),
            initials,
            role: role.to_string(),
            status: MemberStatus::Invited,
            joined_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invited_member_derives_name_and_initials() {
        let member = Member::invited("dev@co.com", "developer", Timestamp::now());

        assert_eq!(member.name, "dev");
        assert_eq!(member.initials, "DE");
        assert_eq!(member.role, "developer");
        assert_eq!(member.status, MemberStatus::Invited);
        assert!(member.joined_at.is_some());
        assert_ne!(member.id, CURRENT_USER_ID);
    }

    #[test]
    fn test_invited_member_without_at_sign() {
        let member = Member::invited("x", "qa", Timestamp::now());

        assert_eq!(member.name, "x");
        assert_eq!(member.initials, "X");
    }

    #[test]
    fn test_status_defaults_to_active_when_missing() {
        let json = r#"{"id":"m1","name":"Ann","initials":"AN"}"#;
        let member: Member = serde_json::from_str(json).unwrap();

        assert_eq!(member.status, MemberStatus::Active);
        assert!(member.email.is_empty());
    }
}
