//! `estoque-api` — thin HTTP handlers over the domain services.
//!
//! No server-side session table: authenticated routes identify the caller
//! through the client-held `x-user-id` header, which the middleware turns
//! into an explicit `Session` for the handlers.

pub mod app;
pub mod middleware;
