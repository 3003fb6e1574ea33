//! Session store: the single source of truth for "is a user logged in".
//!
//! The token and the user identity are written and cleared together. Any
//! state where only one of them is readable, or where the stored user does
//! not parse, is reported as "no session" rather than as an error.

mod storage;

use crate::error::StorageError;
use crate::models::UserIdentity;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Storage key for the raw bearer credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user identity.
pub const USER_KEY: &str = "user";

/// A complete login: credential plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserIdentity,
}

/// Holder of the current session, backed by durable storage.
///
/// Constructed once at startup and shared (by `Arc`) with the API client and
/// the application shell.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Session store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Stores a new session.
    ///
    /// Any previous token is removed first and the new token written last,
    /// so a write interrupted halfway never pairs a token with the wrong user.
    pub fn set_session(&self, token: &str, user: &UserIdentity) -> Result<(), StorageError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| StorageError::Serialize(e.to_string()))?;

        self.storage.remove(TOKEN_KEY)?;
        self.storage.set(USER_KEY, &user_json)?;
        self.storage.set(TOKEN_KEY, token)?;

        tracing::info!(user_id = %user.id, "Session stored");
        Ok(())
    }

    /// Reads the current session, failing safe to `None`.
    pub fn get_session(&self) -> Option<Session> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read stored token: {}", e);
                return None;
            }
        };

        let user_json = match self.storage.get(USER_KEY) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!("Stored token has no user record; treating as logged out");
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read stored user: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<UserIdentity>(&user_json) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!("Stored user record is malformed ({}); treating as logged out", e);
                None
            }
        }
    }

    /// The bearer credential of a complete session.
    pub fn token(&self) -> Option<String> {
        self.get_session().map(|session| session.token)
    }

    /// The identity of a complete session.
    pub fn user(&self) -> Option<UserIdentity> {
        self.get_session().map(|session| session.user)
    }

    /// Removes the session. Clearing an empty store is a no-op.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Presence check only: an expired token still counts until the backend
    /// rejects it.
    pub fn is_authenticated(&self) -> bool {
        self.get_session().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Memory storage whose token writes fail.
    struct FailingTokenWrites(MemoryStorage);

    impl KeyValueStorage for FailingTokenWrites {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == TOKEN_KEY && value != "alice-token" {
                return Err(StorageError::Io(
                    PathBuf::from(key),
                    std::io::Error::other("disk full"),
                ));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    fn user() -> UserIdentity {
        UserIdentity {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn test_set_then_get() {
        let store = SessionStore::in_memory();
        store.set_session("abc", &user()).unwrap();

        let session = store.get_session().unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user, user());
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SessionStore::in_memory();
        store.set_session("abc", &user()).unwrap();

        store.clear_session().unwrap();
        assert!(store.get_session().is_none());
        assert!(!store.is_authenticated());

        store.clear_session().unwrap();
        assert!(store.get_session().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_empty_store() {
        let store = SessionStore::in_memory();
        assert!(store.get_session().is_none());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_token_without_user_is_logged_out() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t1").unwrap();
        let store = SessionStore::new(storage);

        assert!(store.get_session().is_none());
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_malformed_user_is_logged_out() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t1").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();
        let store = SessionStore::new(storage);

        assert!(store.get_session().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_user_without_token_is_logged_out() {
        let storage = MemoryStorage::new();
        storage
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        let store = SessionStore::new(storage);

        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_session_survives_reload() {
        let temp_dir = TempDir::new().unwrap();

        let store = SessionStore::new(FileStorage::new(temp_dir.path().to_path_buf()));
        store.set_session("abc", &user()).unwrap();
        drop(store);

        let reloaded = SessionStore::new(FileStorage::new(temp_dir.path().to_path_buf()));
        let session = reloaded.get_session().unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.email, "a@b.com");
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("token"), "t1").unwrap();
        std::fs::write(temp_dir.path().join("user"), "[1, 2").unwrap();

        let store = SessionStore::new(FileStorage::new(temp_dir.path().to_path_buf()));
        assert!(!store.is_authenticated());

        // Clearing repairs the partial state
        store.clear_session().unwrap();
        assert!(!temp_dir.path().join("token").exists());
        assert!(!temp_dir.path().join("user").exists());
    }

    #[test]
    fn test_failed_token_write_never_mixes_users() {
        let store = SessionStore::new(FailingTokenWrites(MemoryStorage::new()));
        store.set_session("alice-token", &user()).unwrap();

        let bob = UserIdentity {
            id: "2".to_string(),
            name: "Bob".to_string(),
            email: "bob@b.com".to_string(),
        };
        assert!(store.set_session("bob-token", &bob).is_err());

        // Neither Alice's token with Bob's identity nor any other session
        assert!(store.get_session().is_none());
        assert!(!store.is_authenticated());
    }
}
