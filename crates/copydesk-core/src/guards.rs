//! Navigation guards.
//!
//! Pure predicates over session state, evaluated synchronously before a
//! route transition completes. A deny verdict carries the redirect target;
//! the router performs the redirect. Guards never show an error surface.

use crate::session::{Role, SessionStore};

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// The transition may proceed.
    Allow,
    /// Block and redirect to the login route.
    ToLogin,
    /// Block and redirect to the home route.
    ToHome,
}

impl GuardVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardVerdict::Allow)
    }
}

/// Allows only authenticated sessions. Token presence is the whole check;
/// the profile is irrelevant here.
pub fn auth_guard(session: &SessionStore) -> GuardVerdict {
    if session.is_authenticated() {
        GuardVerdict::Allow
    } else {
        GuardVerdict::ToLogin
    }
}

/// Allows only unauthenticated sessions. Keeps signed-in users off the
/// login route.
pub fn public_guard(session: &SessionStore) -> GuardVerdict {
    if session.is_authenticated() {
        GuardVerdict::ToHome
    } else {
        GuardVerdict::Allow
    }
}

/// Allows authenticated sessions whose profile role is in `allowed`.
///
/// Applies the auth check first: a missing token redirects to login. A
/// present token with a missing profile or a role outside `allowed`
/// redirects home.
pub fn role_guard(session: &SessionStore, allowed: &[Role]) -> GuardVerdict {
    if !session.is_authenticated() {
        return GuardVerdict::ToLogin;
    }
    match session.profile() {
        Some(profile) if allowed.contains(&profile.role) => GuardVerdict::Allow,
        _ => GuardVerdict::ToHome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserProfile;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load_from(dir.path().join("session.json")).unwrap();
        (dir, store)
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            date_of_birth: None,
            role,
            locked: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn auth_guard_denies_without_token() {
        let (_dir, session) = store();
        assert_eq!(auth_guard(&session), GuardVerdict::ToLogin);
    }

    #[test]
    fn auth_guard_allows_with_token_regardless_of_profile() {
        let (_dir, session) = store();
        session.set_token(Some("tok".to_string())).unwrap();

        // No profile at all
        assert_eq!(auth_guard(&session), GuardVerdict::Allow);

        // Any profile
        session.set_profile(Some(profile(Role::Guest)));
        assert_eq!(auth_guard(&session), GuardVerdict::Allow);
    }

    #[test]
    fn public_guard_redirects_authenticated_sessions_home() {
        let (_dir, session) = store();
        assert_eq!(public_guard(&session), GuardVerdict::Allow);

        session.set_token(Some("tok".to_string())).unwrap();
        assert_eq!(public_guard(&session), GuardVerdict::ToHome);
    }

    #[test]
    fn role_guard_without_token_goes_to_login() {
        let (_dir, session) = store();
        assert_eq!(role_guard(&session, &[Role::Admin]), GuardVerdict::ToLogin);
    }

    #[test]
    fn role_guard_with_wrong_role_goes_home() {
        let (_dir, session) = store();
        session.set_token(Some("tok".to_string())).unwrap();
        session.set_profile(Some(profile(Role::Writer)));

        assert_eq!(role_guard(&session, &[Role::Admin]), GuardVerdict::ToHome);
    }

    #[test]
    fn role_guard_with_missing_profile_goes_home() {
        let (_dir, session) = store();
        session.set_token(Some("tok".to_string())).unwrap();

        assert_eq!(role_guard(&session, &[Role::Admin]), GuardVerdict::ToHome);
    }

    #[test]
    fn role_guard_allows_matching_role() {
        let (_dir, session) = store();
        session.set_token(Some("tok".to_string())).unwrap();
        session.set_profile(Some(profile(Role::Admin)));

        assert_eq!(role_guard(&session, &[Role::Admin]), GuardVerdict::Allow);
        assert_eq!(
            role_guard(&session, &[Role::Admin, Role::Writer]),
            GuardVerdict::Allow
        );
    }

    #[test]
    fn guards_are_idempotent() {
        let (_dir, session) = store();
        session.set_token(Some("tok".to_string())).unwrap();
        session.set_profile(Some(profile(Role::Writer)));

        for _ in 0..3 {
            assert_eq!(auth_guard(&session), GuardVerdict::Allow);
            assert_eq!(public_guard(&session), GuardVerdict::ToHome);
            assert_eq!(role_guard(&session, &[Role::Admin]), GuardVerdict::ToHome);
        }
    }
}
