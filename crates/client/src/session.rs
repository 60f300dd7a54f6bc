//! Persisted session state.
//!
//! A [`Session`] is a handle over a string key/value [`SessionStore`]. The
//! store plays the role browser local storage plays for the web front ends:
//! [`MemorySessionStore`] for tests and embedded use, [`FileSessionStore`] for
//! the command line where state must survive between invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use bookstand_core::{LoginResponse, Role, UserId};
use secrecy::SecretString;
use thiserror::Error;

/// Session storage keys.
pub mod keys {
    /// Bearer token issued at login.
    pub const TOKEN: &str = "token";
    /// Display name of the logged-in user.
    pub const USERNAME: &str = "username";
    /// `admin` or `user`.
    pub const ROLE: &str = "role";
    /// `"true"` while a login is active.
    pub const LOGGED_IN: &str = "isLoggedIn";
    /// Backend ID of the logged-in user.
    pub const USER_ID: &str = "userId";

    /// Every key a login writes.
    pub const ALL: [&str; 5] = [TOKEN, USERNAME, ROLE, LOGGED_IN, USER_ID];
}

/// Errors from persisting session state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value storage backing a [`Session`].
pub trait SessionStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk.
///
/// The whole file is rewritten on every mutation. A missing file reads as an
/// empty session.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open (or lazily create) the session file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| SessionError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(values).map_err(|source| SessionError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }

    /// Apply `change` to a copy, write it, and only then swap it in. `change`
    /// returns whether anything changed.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), SessionError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.update(|values| values.remove(key).is_some())
    }
}

/// Authentication state derived from the persisted flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }
}

/// Shared session context injected into the HTTP adapter and the guards.
///
/// Cloning is cheap and every clone sees the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.store.get(keys::TOKEN).map(|_| "[REDACTED]"))
            .field("username", &self.username())
            .field("role", &self.store.get(keys::ROLE))
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session over a fresh [`MemorySessionStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Stored bearer token, if any. Empty strings count as absent.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.store
            .get(keys::TOKEN)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.store.get(keys::USERNAME)
    }

    /// Stored role. Unrecognized values read as `None`.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.store.get(keys::ROLE).and_then(|r| r.parse().ok())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.store.get(keys::USER_ID).and_then(|id| id.parse().ok())
    }

    /// True when the logged-in flag is exactly `"true"`.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.get(keys::LOGGED_IN).as_deref() == Some("true")
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        if !self.is_logged_in() {
            return AuthState::Unauthenticated;
        }
        match self.role() {
            Some(Role::Admin) => AuthState::AuthenticatedAdmin,
            _ => AuthState::AuthenticatedUser,
        }
    }

    /// Persist a successful login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if any key cannot be written.
    pub fn begin(&self, login: &LoginResponse) -> Result<(), SessionError> {
        self.store.set(keys::TOKEN, &login.token)?;
        self.store.set(keys::USERNAME, &login.username)?;
        self.store.set(keys::ROLE, login.role.as_str())?;
        match login.user_id {
            Some(id) => self.store.set(keys::USER_ID, &id.to_string())?,
            None => self.store.remove(keys::USER_ID)?,
        }
        self.store.set(keys::LOGGED_IN, "true")?;
        tracing::debug!(username = %login.username, role = %login.role, "Session started");
        Ok(())
    }

    /// Remove every session key.
    ///
    /// Attempts all removals and reports the first failure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if a key cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut first_err = None;
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Read a raw key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn login(role: Role) -> LoginResponse {
        LoginResponse {
            token: "mock-jwt-token-reader-7".to_string(),
            user_id: Some(UserId::new(7)),
            username: "reader".to_string(),
            role,
        }
    }

    #[test]
    fn test_empty_session() {
        let session = Session::in_memory();
        assert!(session.token().is_none());
        assert!(!session.is_logged_in());
        assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_begin_persists_all_keys() {
        let session = Session::in_memory();
        session.begin(&login(Role::User)).unwrap();

        assert_eq!(
            session.token().unwrap().expose_secret(),
            "mock-jwt-token-reader-7"
        );
        assert_eq!(session.username().as_deref(), Some("reader"));
        assert_eq!(session.role(), Some(Role::User));
        assert_eq!(session.user_id(), Some(UserId::new(7)));
        assert_eq!(session.get(keys::LOGGED_IN).as_deref(), Some("true"));
        assert_eq!(session.auth_state(), AuthState::AuthenticatedUser);
    }

    #[test]
    fn test_admin_state() {
        let session = Session::in_memory();
        session.begin(&login(Role::Admin)).unwrap();
        assert_eq!(session.auth_state(), AuthState::AuthenticatedAdmin);
    }

    #[test]
    fn test_logged_in_flag_must_be_true() {
        let store = MemorySessionStore::new();
        store.set(keys::LOGGED_IN, "yes").unwrap();
        store.set(keys::ROLE, "admin").unwrap();
        let session = Session::new(store);
        assert_eq!(session.auth_state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_empty_token_is_absent() {
        let store = MemorySessionStore::new();
        store.set(keys::TOKEN, "").unwrap();
        assert!(Session::new(store).token().is_none());
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let session = Session::in_memory();
        session.begin(&login(Role::User)).unwrap();
        session.clear().unwrap();
        for key in keys::ALL {
            assert!(session.get(key).is_none(), "{key} should be cleared");
        }
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let other = session.clone();
        session.begin(&login(Role::User)).unwrap();
        assert!(other.is_logged_in());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::in_memory();
        session.begin(&login(Role::User)).unwrap();
        let debug = format!("{session:?}");
        assert!(!debug.contains("mock-jwt-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_file_store_round_trips_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::new(FileSessionStore::open(&path).unwrap());
        session.begin(&login(Role::Admin)).unwrap();

        let reopened = Session::new(FileSessionStore::open(&path).unwrap());
        assert_eq!(reopened.username().as_deref(), Some("reader"));
        assert_eq!(reopened.auth_state(), AuthState::AuthenticatedAdmin);

        reopened.clear().unwrap();
        let cleared = FileSessionStore::open(&path).unwrap();
        assert!(cleared.get(keys::TOKEN).is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.get(keys::TOKEN).is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileSessionStore::open(&path),
            Err(SessionError::Json { .. })
        ));
    }

    #[test]
    fn test_file_store_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("state");
        let store = FileSessionStore::open(parent.join("session.json")).unwrap();
        store.set(keys::USERNAME, "reader").unwrap();

        // A regular file where the directory should be makes every write fail.
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, "not a directory").unwrap();

        assert!(store.set(keys::TOKEN, "mock-jwt-token").is_err());
        assert_eq!(store.get(keys::TOKEN), None);

        assert!(store.remove(keys::USERNAME).is_err());
        assert_eq!(store.get(keys::USERNAME).as_deref(), Some("reader"));
    }
}
