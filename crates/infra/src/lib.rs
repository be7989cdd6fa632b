//! `estoque-infra` — implementations of the storage ports.
//!
//! Two backends: [`memory`] (tests/dev) and [`postgres`] (production, via
//! sqlx). Cross-crate behavior tests over the memory backend live in
//! `integration_tests.rs`.

pub mod memory;
pub mod postgres;


pub use memory::{MemoryBarcodeStore, MemoryProductStore, MemoryUserStore};
pub use postgres::{PgBarcodeStore, PgProductStore, PgUserStore, ensure_schema};
