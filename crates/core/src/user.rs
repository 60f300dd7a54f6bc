//! Accounts, profiles and authentication responses.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::timestamp;
use crate::{Email, Gender, Role, UserId, UserStatus};

/// An account as listed by the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// Whether this account may use the back-office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Full profile shown on the customer account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Free-form date string as entered by the user.
    #[serde(default)]
    pub birthday: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub stats: Option<UserStats>,
}

impl UserProfile {
    /// Nickname when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Derived purchase statistics attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub total_orders: u64,
    pub completed_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

/// Account totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsersCount {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

/// Answer to the "does this username exist / is it disabled" check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStatusCheck {
    pub exists: bool,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

impl UserStatusCheck {
    /// True when the account exists but has been disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.exists && self.status == Some(UserStatus::Inactive)
    }
}

/// Successful login payload.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Returned by the storefront login; older admin builds omit it.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub username: String,
    pub role: Role,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_debug_redacts_token() {
        let login = LoginResponse {
            token: "mock-jwt-token-reader-1".to_string(),
            user_id: Some(UserId::new(1)),
            username: "reader".to_string(),
            role: Role::User,
        };
        let debug_output = format!("{login:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("mock-jwt-token"));
    }

    #[test]
    fn test_profile_display_name() {
        let mut profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1, "username": "reader", "email": "r@example.com",
            "role": "user", "status": "active",
            "stats": {"total_orders": 2, "completed_orders": 1, "total_spent": 88.5}
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "reader");
        assert_eq!(profile.stats.unwrap().total_orders, 2);

        profile.nickname = Some("Bookworm".to_string());
        assert_eq!(profile.display_name(), "Bookworm");
    }

    #[test]
    fn test_status_check_disabled() {
        let check: UserStatusCheck =
            serde_json::from_str(r#"{"exists": true, "status": "inactive"}"#).unwrap();
        assert!(check.is_disabled());

        let missing: UserStatusCheck =
            serde_json::from_str(r#"{"exists": false, "status": null}"#).unwrap();
        assert!(!missing.is_disabled());
    }
}
