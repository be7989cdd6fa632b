//! Credential store adapter: register and authenticate against the user store.
//!
//! PINs are hashed with argon2 (salted, one-way); verification delegates to
//! the primitive, which is constant-time at the algorithm level. Both
//! authentication failure paths collapse into the same error kind and
//! message so callers cannot tell whether the username existed.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use estoque_core::{DomainError, DomainResult, UserId};

use crate::identity::{Identity, UserStore};

/// Wraps the `users` table with hash-and-compare semantics.
pub struct CredentialAdapter {
    users: Arc<dyn UserStore>,
}

impl CredentialAdapter {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new identity with `is_master = false`.
    ///
    /// The store's uniqueness constraint is the authoritative duplicate
    /// signal; there is no pre-insert existence query.
    pub async fn register(&self, username: &str, pin: &str) -> DomainResult<Identity> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        validate_pin(pin)?;

        let identity = Identity {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: hash_pin(pin)?,
            is_master: false,
        };

        let created = self.users.insert(identity).await?;
        tracing::info!(user_id = %created.id, "registered new identity");
        Ok(created)
    }

    /// Authenticate against the stored hash.
    ///
    /// Unknown username and wrong pin return the identical error.
    pub async fn authenticate(&self, username: &str, pin: &str) -> DomainResult<Identity> {
        let username = username.trim();

        let Some(identity) = self.users.find_by_username(username).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        if !verify_pin(&identity.password_hash, pin) {
            return Err(DomainError::InvalidCredentials);
        }

        tracing::debug!(user_id = %identity.id, "authenticated");
        Ok(identity)
    }
}

/// A pin is exactly 4 ASCII digits.
pub fn validate_pin(pin: &str) -> DomainResult<()> {
    if pin.len() != 4 || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::validation(
            "pin must be exactly 4 numeric digits",
        ));
    }
    Ok(())
}

fn hash_pin(pin: &str) -> DomainResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| DomainError::storage(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| DomainError::storage(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| DomainError::storage(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_pin(hash: &str, pin: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
