//! Session guard for admin pages.
//!
//! This is a UX convenience, not a security boundary: it only looks at a flag
//! the client itself wrote. The backend must authorize every request.

use crate::session::{SessionStore, keys};

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// True iff the persisted flag is exactly `"true"`.
///
/// Missing values, other strings, and unreadable stores all count as logged
/// out.
#[must_use]
pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    matches!(store.get(keys::IS_AUTHENTICATED), Ok(Some(flag)) if flag == "true")
}

/// Guard progress for one protected page instance.
///
/// ```text
/// Unchecked ──check──▶ Authenticated   (render the page)
///           └─check──▶ Redirecting     (send to LOGIN_ROUTE, render nothing)
/// ```
///
/// Both outcomes are terminal: checking again does not change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unchecked,
    Authenticated,
    Redirecting,
}

impl GuardState {
    /// Run the check. `None` stands for "no storage available", as during
    /// server-side rendering without a session, and always redirects.
    #[must_use]
    pub fn check(self, store: Option<&dyn SessionStore>) -> Self {
        match self {
            Self::Unchecked => {
                if store.is_some_and(is_authenticated) {
                    Self::Authenticated
                } else {
                    Self::Redirecting
                }
            }
            settled => settled,
        }
    }

    /// Redirect target once the check has landed on [`GuardState::Redirecting`].
    #[must_use]
    pub const fn redirect_to(self) -> Option<&'static str> {
        match self {
            Self::Redirecting => Some(LOGIN_ROUTE),
            _ => None,
        }
    }

    /// Whether the protected content may render.
    #[must_use]
    pub const fn may_render(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{MemoryStore, Session};

    #[test]
    fn test_only_literal_true_counts() {
        for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("", false)] {
            let store = MemoryStore::with_values([(keys::IS_AUTHENTICATED, value)]);
            assert_eq!(is_authenticated(&store), expected, "flag {value:?}");
        }
        assert!(!is_authenticated(&MemoryStore::default()));
    }

    #[test]
    fn test_check_without_storage_redirects() {
        let state = GuardState::Unchecked.check(None);
        assert_eq!(state, GuardState::Redirecting);
        assert_eq!(state.redirect_to(), Some("/login"));
        assert!(!state.may_render());
    }

    #[test]
    fn test_check_with_login() {
        let session = Session::in_memory();
        session.establish("tok").unwrap();

        let state = GuardState::default().check(Some(session.store()));
        assert_eq!(state, GuardState::Authenticated);
        assert!(state.may_render());
        assert_eq!(state.redirect_to(), None);
    }

    #[test]
    fn test_outcomes_are_terminal() {
        let session = Session::in_memory();
        let redirecting = GuardState::Unchecked.check(Some(session.store()));

        session.establish("tok").unwrap();
        assert_eq!(
            redirecting.check(Some(session.store())),
            GuardState::Redirecting
        );

        session.clear().unwrap();
        assert_eq!(
            GuardState::Authenticated.check(Some(session.store())),
            GuardState::Authenticated
        );
    }
}
