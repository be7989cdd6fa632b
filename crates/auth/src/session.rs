//! Per-request session context.
//!
//! Who is logged in is an explicit value passed into every operation that
//! needs it, never ambient global state. The HTTP layer builds one from the
//! client-held identity; there is no server-side session table.

use estoque_core::{DomainError, DomainResult};

use crate::identity::Identity;

/// Holder of the currently authenticated identity, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// A session with nobody logged in.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A session for an identity that already passed authentication.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Explicit logout; the session reverts to anonymous.
    pub fn logout(&mut self) {
        self.identity = None;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The authenticated identity, or `Unauthorized`.
    pub fn require(&self) -> DomainResult<&Identity> {
        self.identity.as_ref().ok_or(DomainError::Unauthorized)
    }

    pub fn is_master(&self) -> bool {
        self.identity.as_ref().is_some_and(|i| i.is_master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estoque_core::UserId;

    fn identity(is_master: bool) -> Identity {
        Identity {
            id: UserId::new(),
            username: "maria".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            is_master,
        }
    }

    #[test]
    fn anonymous_session_rejects_require() {
        let session = Session::anonymous();
        assert_eq!(session.require().unwrap_err(), DomainError::Unauthorized);
        assert!(!session.is_master());
    }

    #[test]
    fn authenticated_session_exposes_identity_until_logout() {
        let id = identity(true);
        let mut session = Session::authenticated(id.clone());
        assert_eq!(session.require().unwrap(), &id);
        assert!(session.is_master());

        session.logout();
        assert!(session.identity().is_none());
        assert!(session.require().is_err());
    }
}
