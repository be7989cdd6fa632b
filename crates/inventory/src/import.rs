//! Master-only batch insert of product rows.

use std::sync::Arc;

use chrono::Utc;

use estoque_auth::UserStore;
use estoque_core::{DomainError, DomainResult, UserId};

use crate::product::{ProductDraft, ProductRecord};
use crate::store::ProductStore;

/// Outcome of a successful bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
}

/// Validates the actor's master claim, then inserts a batch of rows
/// attributed to that actor. All-or-nothing: a single failed row fails the
/// whole batch.
pub struct BulkImporter {
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
}

impl BulkImporter {
    pub fn new(users: Arc<dyn UserStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { users, products }
    }

    /// Import `drafts` on behalf of `actor_id`.
    ///
    /// Authorization is checked before any row is even looked at, so
    /// non-master callers learn nothing about the expected row shape.
    pub async fn bulk_import(
        &self,
        actor_id: UserId,
        drafts: Vec<ProductDraft>,
    ) -> DomainResult<ImportReport> {
        let actor = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;
        if !actor.is_master {
            return Err(DomainError::Unauthorized);
        }

        let now = Utc::now();
        let mut records = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.into_iter().enumerate() {
            let new = draft.validate().map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("row {index}: {msg}"))
                }
                other => other,
            })?;
            records.push(ProductRecord::stamped(new, Some(actor.id), now));
        }

        let inserted = self.products.insert_batch(records).await?;
        tracing::info!(actor_id = %actor.id, inserted, "bulk import committed");
        Ok(ImportReport { inserted })
    }
}
