//! Owner-scoped create/list/delete over the products table.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use estoque_auth::Identity;
use estoque_core::{DomainError, DomainResult, ProductId, UserId};

use crate::product::{ProductForm, ProductRecord};
use crate::stats::InventoryStats;
use crate::store::ProductStore;

/// Optional inclusive calendar-date bounds on `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a row created at `at` falls inside the bounds.
    pub fn contains(&self, at: chrono::DateTime<Utc>) -> bool {
        let date = at.date_naive();
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Create/list/delete operations against the `products` table.
pub struct ProductRepository {
    products: Arc<dyn ProductStore>,
}

impl ProductRepository {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Validate the form and persist one row owned by `owner`.
    pub async fn create(&self, form: ProductForm, owner: UserId) -> DomainResult<ProductRecord> {
        let new = form.validate()?;
        let record = ProductRecord::stamped(new, Some(owner), Utc::now());
        let created = self.products.insert(record).await?;
        tracing::info!(product_id = %created.id, codigo_pa = %created.codigo_pa, "product created");
        Ok(created)
    }

    /// Finite snapshot of the owner's rows, most recent first.
    pub async fn list(&self, owner: UserId, range: &DateRange) -> DomainResult<Vec<ProductRecord>> {
        self.products.list_by_owner(owner, range).await
    }

    /// Delete a row the actor is allowed to remove.
    ///
    /// Non-masters may only delete rows they own; ownerless rows and other
    /// users' rows require the master role.
    pub async fn delete(&self, actor: &Identity, id: ProductId) -> DomainResult<()> {
        let record = self
            .products
            .get(id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let owns_it = record.owner_id == Some(actor.id);
        if !owns_it && !actor.is_master {
            return Err(DomainError::Unauthorized);
        }

        if !self.products.delete(id).await? {
            return Err(DomainError::NotFound);
        }
        tracing::info!(product_id = %id, actor_id = %actor.id, "product deleted");
        Ok(())
    }

    /// Dashboard counters over the whole table (not owner-scoped).
    pub async fn stats(&self) -> DomainResult<InventoryStats> {
        self.products.stats(Utc::now()).await
    }
}

/// Free-text filter over an already-fetched snapshot; never re-queries.
///
/// Case-insensitive substring over PA code, description and lot;
/// case-sensitive over the barcode. An empty term keeps everything.
pub fn filter_snapshot<'a>(rows: &'a [ProductRecord], term: &str) -> Vec<&'a ProductRecord> {
    let term = term.trim();
    if term.is_empty() {
        return rows.iter().collect();
    }
    let needle = term.to_lowercase();

    rows.iter()
        .filter(|p| {
            p.codigo_pa.to_lowercase().contains(&needle)
                || p.descricao.to_lowercase().contains(&needle)
                || p.lote.to_lowercase().contains(&needle)
                || p.codigo_barras.as_deref().is_some_and(|b| b.contains(term))
        })
        .collect()
}
