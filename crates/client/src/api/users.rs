//! Users, authentication and profiles.

use bookstand_core::{
    Email, Gender, LoginResponse, Role, User, UserId, UserProfile, UserStatus, UserStatusCheck,
    UsersCount,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use serde_json::json;
use tracing::{error, instrument};

use super::ensure_present;
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_option<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Credentials for `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Payload for `POST /register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Payload for `POST /users`.
#[derive(Debug, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Partial update for `PUT /users/:id`.
#[derive(Debug, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(serialize_with = "expose_option", skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }
}

/// Partial update for `PUT /user/profile/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Payload for `PUT /user/password/:id`.
#[derive(Debug, Serialize)]
pub struct PasswordChange {
    #[serde(serialize_with = "expose")]
    pub old_password: SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
}

/// User and account operations.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    api: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Every user account.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/users"))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch user list"))?;
        Ok(payload.list_or_empty("users"))
    }

    /// Create an account from the back-office.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for a blank username, otherwise the
    /// adapter's error.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn add_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let result: Result<User, ApiError> = async {
            ensure_present("username", &user.username)?;
            let payload = self
                .api
                .execute(ApiRequest::post("/users").json(user)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to add user"))
    }

    /// Update an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an empty update, otherwise the
    /// adapter's error.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        let result: Result<User, ApiError> = async {
            if update.is_empty() {
                return Err(ApiError::Invalid("user update has no fields".to_string()));
            }
            let payload = self
                .api
                .execute(ApiRequest::put(format!("/users/{id}")).json(update)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update user"))
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(format!("/users/{id}")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete user"))?;
        Ok(())
    }

    /// Enable or disable an account.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %id, status = %status))]
    pub async fn set_user_status(&self, id: UserId, status: UserStatus) -> Result<User, ApiError> {
        let result: Result<User, ApiError> = async {
            let request = ApiRequest::patch(format!("/users/{id}/status")).json(&json!({ "status": status }))?;
            let payload = self
                .api
                .execute(request)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to change user status"))
    }

    /// Account totals.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn users_count(&self) -> Result<UsersCount, ApiError> {
        let result: Result<UsersCount, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get("/users/count"))
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch user statistics"))
    }

    /// Exchange credentials for a token. Does not touch the session; the
    /// application facades do that.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` with 401 for bad credentials and 403 for a
    /// disabled account, `ApiError::Shape` if the token is missing.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let result: Result<LoginResponse, ApiError> = async {
            ensure_present("username", &credentials.username)?;
            let payload = self
                .api
                .execute(ApiRequest::post("/login").json(credentials)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Login failed"))
    }

    /// Self-service sign-up.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` with 400 when the username or email is
    /// taken, otherwise the adapter's error.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &RegisterRequest) -> Result<User, ApiError> {
        let result: Result<User, ApiError> = async {
            ensure_present("username", &registration.username)?;
            let payload = self
                .api
                .execute(ApiRequest::post("/register").json(registration)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Registration failed"))
    }

    /// Whether a username exists and is enabled.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn check_user_status(&self, username: &str) -> Result<UserStatusCheck, ApiError> {
        let result: Result<UserStatusCheck, ApiError> = async {
            let request = ApiRequest::post("/check-user-status").json(&json!({ "username": username }))?;
            let payload = self
                .api
                .execute(request)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to check user status"))
    }

    /// The account behind the current token. `None` when the backend returns
    /// no data.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        let result: Result<Option<User>, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get("/user/info"))
                .await?;
            Ok(payload.optional()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch current user"))
    }

    /// Profile with order statistics.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails, or `ApiError::Shape`
    /// if no profile is returned.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user_profile(&self, id: UserId) -> Result<UserProfile, ApiError> {
        let result: Result<UserProfile, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get(format!("/user/profile/{id}")))
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch user profile"))
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user_profile(&self, id: UserId, update: &ProfileUpdate) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            self.api
                .execute(ApiRequest::put(format!("/user/profile/{id}")).json(update)?)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update user profile"))
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an empty new password, otherwise the
    /// adapter's error.
    #[instrument(skip(self, change), fields(user_id = %id))]
    pub async fn change_password(&self, id: UserId, change: &PasswordChange) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            ensure_present("new_password", change.new_password.expose_secret())?;
            self.api
                .execute(ApiRequest::put(format!("/user/password/{id}")).json(change)?)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to change password"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_sends_password_but_debug_hides_it() {
        let login = LoginRequest::new("admin", SecretString::from("s3cret-pass"));
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            json!({"username": "admin", "password": "s3cret-pass"})
        );
        assert!(!format!("{login:?}").contains("s3cret-pass"));
    }

    #[test]
    fn test_user_update_sends_only_set_fields() {
        let update = UserUpdate {
            role: Some(Role::Admin),
            password: Some(SecretString::from("n3w")),
            ..UserUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"password": "n3w", "role": "admin"})
        );
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_new_user_body() {
        let user = NewUser {
            username: "reader".to_string(),
            email: "reader@example.com".parse().unwrap(),
            password: SecretString::from("pw"),
            role: Role::User,
            status: None,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "username": "reader",
                "email": "reader@example.com",
                "password": "pw",
                "role": "user",
            })
        );
    }

    #[test]
    fn test_profile_update_body() {
        let update = ProfileUpdate {
            nickname: Some("书虫".to_string()),
            gender: Some(Gender::Female),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"nickname": "书虫", "gender": "female"})
        );
    }

    #[test]
    fn test_password_change_body() {
        let change = PasswordChange {
            old_password: SecretString::from("old"),
            new_password: SecretString::from("new"),
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"old_password": "old", "new_password": "new"})
        );
    }
}
