//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance. Each operation
//! takes the table lock once, so the per-call atomicity contract of the
//! ports holds trivially (the username uniqueness check runs under the
//! same write lock as the insert).

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use estoque_auth::{Identity, UserStore};
use estoque_core::{DomainError, DomainResult, Entity, ProductId, UserId};
use estoque_inventory::{
    BarcodeRef, BarcodeStore, DateRange, InventoryStats, ProductRecord, ProductStore,
};

/// A single locked table keyed by entity id.
struct Table<T: Entity> {
    rows: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity + Clone> Table<T> {
    fn new() -> Self {
        Self::default()
    }

    fn with_read<R>(&self, f: impl FnOnce(&HashMap<T::Id, T>) -> R) -> DomainResult<R> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(f(&rows))
    }

    fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<T::Id, T>) -> R) -> DomainResult<R> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(f(&mut rows))
    }
}

/// In-memory `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    table: Table<Identity>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, identity: Identity) -> DomainResult<Identity> {
        self.table.with_write(|rows| {
            if rows.values().any(|u| u.username == identity.username) {
                return Err(DomainError::DuplicateUsername);
            }
            rows.insert(identity.id(), identity.clone());
            Ok(identity)
        })?
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>> {
        self.table
            .with_read(|rows| rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<Identity>> {
        self.table.with_read(|rows| rows.get(&id).cloned())
    }

    async fn usernames(&self) -> DomainResult<HashMap<UserId, String>> {
        self.table.with_read(|rows| {
            rows.values()
                .map(|u| (u.id, u.username.clone()))
                .collect()
        })
    }
}

/// In-memory `products` table.
#[derive(Default)]
pub struct MemoryProductStore {
    table: Table<ProductRecord>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryProductStore {
    async fn insert(&self, record: ProductRecord) -> DomainResult<ProductRecord> {
        self.table.with_write(|rows| {
            rows.insert(record.id(), record.clone());
            record
        })
    }

    async fn insert_batch(&self, records: Vec<ProductRecord>) -> DomainResult<u64> {
        // One write lock for the whole batch: all rows land or none do.
        self.table.with_write(|rows| {
            let count = records.len() as u64;
            for record in records {
                rows.insert(record.id(), record);
            }
            count
        })
    }

    async fn find_latest_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<ProductRecord>> {
        self.table.with_read(|rows| {
            rows.values()
                .filter(|p| p.codigo_pa == codigo_pa)
                .max_by(|a, b| a.created_at.cmp(&b.created_at))
                .cloned()
        })
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        range: &DateRange,
    ) -> DomainResult<Vec<ProductRecord>> {
        self.table.with_read(|rows| {
            let mut matched: Vec<ProductRecord> = rows
                .values()
                .filter(|p| p.owner_id == Some(owner) && range.contains(p.created_at))
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            matched
        })
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<ProductRecord>> {
        self.table.with_read(|rows| rows.get(&id).cloned())
    }

    async fn delete(&self, id: ProductId) -> DomainResult<bool> {
        self.table.with_write(|rows| rows.remove(&id).is_some())
    }

    async fn stats(&self, now: DateTime<Utc>) -> DomainResult<InventoryStats> {
        self.table
            .with_read(|rows| InventoryStats::summarize(rows.values(), now))
    }
}

/// In-memory `barcodes` reference table, seeded at construction.
#[derive(Default)]
pub struct MemoryBarcodeStore {
    rows: RwLock<Vec<BarcodeRef>>,
}

impl MemoryBarcodeStore {
    pub fn new(rows: Vec<BarcodeRef>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait::async_trait]
impl BarcodeStore for MemoryBarcodeStore {
    async fn find_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<BarcodeRef>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(rows
            .iter()
            .find(|r| r.codigo_pa.as_deref() == Some(codigo_pa))
            .cloned())
    }
}
