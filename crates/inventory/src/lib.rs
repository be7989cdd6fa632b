//! `estoque-inventory` — product records and the operations over them.
//!
//! The pieces: the record/draft shapes with their validation
//! ([`product`]), the store ports ([`store`]), the PA-code lookup with
//! barcode-table precedence ([`resolver`]), the owner-scoped repository
//! ([`repository`]), the master-only batch importer ([`import`]) and the
//! dashboard counters ([`stats`]).

pub mod import;
pub mod product;
pub mod repository;
pub mod resolver;
pub mod stats;
pub mod store;

pub use import::{BulkImporter, ImportReport};
pub use product::{BarcodeRef, NewProduct, ProductDraft, ProductForm, ProductRecord};
pub use repository::{DateRange, ProductRepository, filter_snapshot};
pub use resolver::{Autofill, ProductResolver};
pub use stats::InventoryStats;
pub use store::{BarcodeStore, ProductStore};
