//! `estoque-auth` — identity, credentials and the per-request session.
//!
//! This crate is intentionally decoupled from HTTP and from the concrete
//! store: it owns the `Identity` row shape, the `UserStore` port, the
//! credential adapter (register/authenticate with a 4-digit PIN) and the
//! explicit session context that gates the rest of the system.

pub mod credential;
pub mod identity;
pub mod session;

pub use credential::{CredentialAdapter, validate_pin};
pub use identity::{Identity, UserStore};
pub use session::Session;
