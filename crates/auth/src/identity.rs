//! Identity row shape and the user-store port.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use estoque_core::{DomainResult, Entity, UserId};

/// A registered user.
///
/// Created by sign-up; never mutated or deleted in scope. `password_hash`
/// holds an argon2 PHC string and must never leave the server boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub is_master: bool,
}

impl Entity for Identity {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Port over the `users` table.
///
/// Uniqueness of `username` is the store's responsibility: `insert` must be
/// atomic with the uniqueness check (unique index, or a check under the same
/// lock) and signal a conflict as `DomainError::DuplicateUsername`.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new identity. Fails with `DuplicateUsername` on conflict.
    async fn insert(&self, identity: Identity) -> DomainResult<Identity>;

    /// Exact match on the (already trimmed) username.
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>>;

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<Identity>>;

    /// Id → username map for owner display-name resolution (export).
    async fn usernames(&self) -> DomainResult<HashMap<UserId, String>>;
}
