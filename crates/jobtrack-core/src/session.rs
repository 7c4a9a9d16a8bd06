//! Session domain model.
//!
//! The session decides where writes go: an authenticated session persists to
//! the remote store, an anonymous one to the local fallback store.

use serde::{Deserialize, Serialize};

/// Identity of a signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// The current session: nobody signed in, or a known user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(UserIdentity),
}

impl Session {
    pub fn authenticated(user: UserIdentity) -> Self {
        Session::Authenticated(user)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// Returns the signed-in user's id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user.user_id.as_str()),
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }
}

/// Sign-in / sign-out transitions published by an auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn { user: UserIdentity },
    SignedOut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accessors() {
        assert_eq!(Session::Anonymous.user_id(), None);
        assert!(!Session::default().is_authenticated());

        let session = Session::authenticated(UserIdentity::new("u-1").with_email("a@b.c"));
        assert!(session.is_authenticated());
        assert_eq!(session.user_id(), Some("u-1"));
        assert_eq!(
            session.user().and_then(|u| u.email.as_deref()),
            Some("a@b.c")
        );
    }
}
