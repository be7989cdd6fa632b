//! Postgres-backed store implementations (sqlx).
//!
//! One wrapper struct per table, sharing a `PgPool`. The username unique
//! index is the authoritative duplicate signal (SQLSTATE 23505 maps to
//! `DuplicateUsername`); the batch insert runs inside one transaction so
//! either every row lands or none do.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use estoque_auth::{Identity, UserStore};
use estoque_core::{DomainError, DomainResult, ProductId, UserId};
use estoque_inventory::{
    BarcodeRef, BarcodeStore, DateRange, InventoryStats, ProductRecord, ProductStore,
};

const UNIQUE_VIOLATION: &str = "23505";

/// Table definitions; applied idempotently at startup.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_master     BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS products (
    id            UUID PRIMARY KEY,
    codigo_pa     TEXT NOT NULL,
    descricao     TEXT NOT NULL,
    quantidade    INTEGER NOT NULL CHECK (quantidade >= 0),
    lote          TEXT NOT NULL,
    validade      DATE NOT NULL,
    codigo_barras TEXT,
    owner_id      UUID REFERENCES users (id),
    created_at    TIMESTAMPTZ NOT NULL,
    updated_at    TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS products_codigo_pa_idx ON products (codigo_pa, created_at DESC);
CREATE INDEX IF NOT EXISTS products_owner_idx ON products (owner_id, created_at DESC);

CREATE TABLE IF NOT EXISTS barcodes (
    codigo_barras TEXT PRIMARY KEY,
    codigo_pa     TEXT,
    descricao     TEXT
);

CREATE INDEX IF NOT EXISTS barcodes_codigo_pa_idx ON barcodes (codigo_pa);
"#;

/// Create the tables and indexes if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> DomainResult<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(storage)?;
    tracing::debug!("database schema ensured");
    Ok(())
}

fn storage(e: sqlx::Error) -> DomainError {
    DomainError::storage(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Postgres `users` table.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn identity_from_row(row: &PgRow) -> DomainResult<Identity> {
    Ok(Identity {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage)?),
        username: row.try_get("username").map_err(storage)?,
        password_hash: row.try_get("password_hash").map_err(storage)?,
        is_master: row.try_get("is_master").map_err(storage)?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, identity: Identity) -> DomainResult<Identity> {
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, is_master) VALUES ($1, $2, $3, $4)",
        )
        .bind(*identity.id.as_uuid())
        .bind(&identity.username)
        .bind(&identity.password_hash)
        .bind(identity.is_master)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateUsername
            } else {
                storage(e)
            }
        })?;
        Ok(identity)
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, is_master FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        row.as_ref().map(identity_from_row).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<Identity>> {
        let row =
            sqlx::query("SELECT id, username, password_hash, is_master FROM users WHERE id = $1")
                .bind(*id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;
        row.as_ref().map(identity_from_row).transpose()
    }

    async fn usernames(&self) -> DomainResult<HashMap<UserId, String>> {
        let rows = sqlx::query("SELECT id, username FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.iter()
            .map(|row| {
                let id = UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage)?);
                let username: String = row.try_get("username").map_err(storage)?;
                Ok((id, username))
            })
            .collect()
    }
}

/// Postgres `products` table.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "id, codigo_pa, descricao, quantidade, lote, validade, \
     codigo_barras, owner_id, created_at, updated_at";

fn product_from_row(row: &PgRow) -> DomainResult<ProductRecord> {
    let quantidade: i32 = row.try_get("quantidade").map_err(storage)?;
    Ok(ProductRecord {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage)?),
        codigo_pa: row.try_get("codigo_pa").map_err(storage)?,
        descricao: row.try_get("descricao").map_err(storage)?,
        quantidade: u32::try_from(quantidade)
            .map_err(|_| DomainError::storage("negative quantidade in store"))?,
        lote: row.try_get("lote").map_err(storage)?,
        validade: row.try_get::<NaiveDate, _>("validade").map_err(storage)?,
        codigo_barras: row.try_get("codigo_barras").map_err(storage)?,
        owner_id: row
            .try_get::<Option<Uuid>, _>("owner_id")
            .map_err(storage)?
            .map(UserId::from_uuid),
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(storage)?,
    })
}

fn bind_product<'q>(
    query: sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>,
    record: &'q ProductRecord,
) -> sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(*record.id.as_uuid())
        .bind(&record.codigo_pa)
        .bind(&record.descricao)
        .bind(record.quantidade as i32)
        .bind(&record.lote)
        .bind(record.validade)
        .bind(&record.codigo_barras)
        .bind(record.owner_id.map(|o| *o.as_uuid()))
        .bind(record.created_at)
        .bind(record.updated_at)
}

const INSERT_PRODUCT: &str = "INSERT INTO products (id, codigo_pa, descricao, quantidade, lote, \
     validade, codigo_barras, owner_id, created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";

/// Owner-scoped listing query. The `created_at` bounds compare the UTC
/// calendar date — `AT TIME ZONE 'UTC'` keeps the cast independent of the
/// session time zone, matching `DateRange::contains` on the domain side.
fn list_by_owner_query(owner: Uuid, range: &DateRange) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = "));
    builder.push_bind(owner);
    if let Some(start) = range.start {
        builder.push(" AND (created_at AT TIME ZONE 'UTC')::date >= ");
        builder.push_bind(start);
    }
    if let Some(end) = range.end {
        builder.push(" AND (created_at AT TIME ZONE 'UTC')::date <= ");
        builder.push_bind(end);
    }
    builder.push(" ORDER BY created_at DESC");
    builder
}

#[async_trait::async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, record: ProductRecord) -> DomainResult<ProductRecord> {
        bind_product(sqlx::query(INSERT_PRODUCT), &record)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(record)
    }

    async fn insert_batch(&self, records: Vec<ProductRecord>) -> DomainResult<u64> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        for record in &records {
            bind_product(sqlx::query(INSERT_PRODUCT), record)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }
        tx.commit().await.map_err(storage)?;
        Ok(records.len() as u64)
    }

    async fn find_latest_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<ProductRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE codigo_pa = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(codigo_pa)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        range: &DateRange,
    ) -> DomainResult<Vec<ProductRecord>> {
        let mut builder = list_by_owner_query(*owner.as_uuid(), range);
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn get(&self, id: ProductId) -> DomainResult<Option<ProductRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn delete(&self, id: ProductId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self, now: DateTime<Utc>) -> DomainResult<InventoryStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_products, \
             COUNT(*) FILTER (WHERE validade <= $1) AS expiring_soon, \
             COALESCE(SUM(quantidade), 0)::BIGINT AS total_quantity, \
             COUNT(*) FILTER (WHERE created_at >= $2) AS recent_products \
             FROM products",
        )
        .bind(now.date_naive() + Duration::days(30))
        .bind(now - Duration::days(7))
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        let counter = |name: &str| -> DomainResult<u64> {
            let value: i64 = row.try_get(name).map_err(storage)?;
            u64::try_from(value).map_err(|_| DomainError::storage("negative aggregate"))
        };
        Ok(InventoryStats {
            total_products: counter("total_products")?,
            expiring_soon: counter("expiring_soon")?,
            total_quantity: counter("total_quantity")?,
            recent_products: counter("recent_products")?,
        })
    }
}

/// Postgres `barcodes` reference table (read-only from the application).
pub struct PgBarcodeStore {
    pool: PgPool,
}

impl PgBarcodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BarcodeStore for PgBarcodeStore {
    async fn find_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<BarcodeRef>> {
        let row = sqlx::query(
            "SELECT codigo_barras, codigo_pa, descricao FROM barcodes \
             WHERE codigo_pa = $1 LIMIT 1",
        )
        .bind(codigo_pa)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(|r| {
            Ok(BarcodeRef {
                codigo_barras: r.try_get("codigo_barras").map_err(storage)?,
                codigo_pa: r.try_get("codigo_pa").map_err(storage)?,
                descricao: r.try_get("descricao").map_err(storage)?,
            })
        })
        .transpose()
    }
}
