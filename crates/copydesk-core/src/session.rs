//! Session state for the console.
//!
//! The session store is the single source of truth for "who is logged in and
//! with what credential". The token is persisted to a durable file so a
//! restart does not force re-login; the cached profile lives in memory only
//! and is re-fetched from the server after a restart.
//!
//! Tokens are never logged or displayed in full.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::paths;

/// User role as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Writer,
    Guest,
}

impl Role {
    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Writer, Role::Guest]
    }

    /// Returns the string identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Writer => "writer",
            Role::Guest => "guest",
        }
    }

    /// Returns the Role for a given id string.
    pub fn from_id(id: &str) -> Option<Role> {
        match id.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "writer" => Some(Role::Writer),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    /// Returns the human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Writer => "Writer",
            Role::Guest => "Guest",
        }
    }
}

/// Profile of the signed-in user.
///
/// Read-only projection of server user data; only the session store holds
/// the cached copy, and it may lag the server between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub locked: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// On-disk shape of the durable session file. Holds exactly the token.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    token: Option<String>,
}

impl SessionFile {
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))
    }

    fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::fs::OpenOptions;
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    fn remove(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Process-wide session state: bearer token plus cached user profile.
///
/// Shared as `Arc<SessionStore>`; all mutation goes through the setters here.
/// Profile observation is a replay-latest broadcast: a new subscriber sees
/// the current value immediately, then every subsequent value.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    token: RwLock<Option<String>>,
    profile: watch::Sender<Option<UserProfile>>,
}

impl SessionStore {
    /// Loads the session from the default durable location.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::session_path())
    }

    /// Loads the session from a specific file path.
    ///
    /// The token (if any) survives restarts; the profile never does and
    /// starts out absent.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let token = SessionFile::read(&path)?.token;
        Ok(Self {
            path,
            token: RwLock::new(token),
            profile: watch::Sender::new(None),
        })
    }

    /// Returns the current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Sets or clears the token, persisting the change to the durable file.
    ///
    /// Clearing the token does NOT clear the cached profile; use [`clear`]
    /// for the logout path.
    ///
    /// [`clear`]: SessionStore::clear
    pub fn set_token(&self, token: Option<String>) -> Result<()> {
        {
            let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
            *guard = token.clone();
        }
        match token {
            Some(token) => SessionFile { token: Some(token) }.write(&self.path),
            None => SessionFile::remove(&self.path),
        }
    }

    /// Returns the last-set profile without refetching.
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.borrow().clone()
    }

    /// Updates the in-memory profile and notifies subscribers.
    ///
    /// Not persisted: a restart requires re-fetching the profile even though
    /// the token survives.
    pub fn set_profile(&self, profile: Option<UserProfile>) {
        self.profile.send_replace(profile);
    }

    /// Subscribes to profile changes.
    ///
    /// The receiver observes the current value immediately and each new
    /// value after that; intermediate values may be skipped by slow readers
    /// since each new value overwrites the last.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.profile.subscribe()
    }

    /// Logout path: clears token and profile together.
    pub fn clear(&self) -> Result<()> {
        self.set_profile(None);
        self.set_token(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            date_of_birth: None,
            role,
            locked: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::load_from(dir.path().join("session.json")).unwrap()
    }

    #[test]
    fn getters_reflect_most_recent_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.token(), None);
        assert_eq!(store.profile(), None);

        store.set_token(Some("tok-1".to_string())).unwrap();
        store.set_profile(Some(profile(Role::Writer)));
        assert_eq!(store.token().as_deref(), Some("tok-1"));
        assert_eq!(store.profile().unwrap().role, Role::Writer);

        store.set_token(Some("tok-2".to_string())).unwrap();
        assert_eq!(store.token().as_deref(), Some("tok-2"));
    }

    #[test]
    fn clearing_token_alone_leaves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_token(Some("tok".to_string())).unwrap();
        store.set_profile(Some(profile(Role::Admin)));

        store.set_token(None).unwrap();

        assert_eq!(store.token(), None);
        assert!(store.profile().is_some());
    }

    #[test]
    fn clear_drops_both_token_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_token(Some("tok".to_string())).unwrap();
        store.set_profile(Some(profile(Role::Admin)));

        store.clear().unwrap();

        assert_eq!(store.token(), None);
        assert_eq!(store.profile(), None);
    }

    #[test]
    fn token_survives_reload_profile_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load_from(path.clone()).unwrap();
        store.set_token(Some("tok".to_string())).unwrap();
        store.set_profile(Some(profile(Role::Admin)));
        drop(store);

        let reloaded = SessionStore::load_from(path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("tok"));
        assert_eq!(reloaded.profile(), None);
    }

    #[test]
    fn clearing_token_removes_durable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load_from(path.clone()).unwrap();
        store.set_token(Some("tok".to_string())).unwrap();
        assert!(path.exists());

        store.set_token(None).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn subscriber_sees_current_value_then_updates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_profile(Some(profile(Role::Writer)));

        // Late subscriber replays the latest value immediately.
        let mut rx = store.subscribe();
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().role, Role::Writer);
        assert!(!rx.has_changed().unwrap());

        store.set_profile(Some(profile(Role::Admin)));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().role, Role::Admin);

        store.set_profile(None);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn role_ids_round_trip() {
        for role in Role::all() {
            assert_eq!(Role::from_id(role.id()), Some(*role));
        }
        assert_eq!(Role::from_id("editor"), None);
    }

    #[test]
    fn profile_deserializes_wire_shape() {
        let json = r#"{
            "_id": "665f1c",
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "date_of_birth": null,
            "role": "writer",
            "locked": false,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-02-01T00:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "665f1c");
        assert_eq!(profile.role, Role::Writer);
        assert!(!profile.locked);
    }
}
