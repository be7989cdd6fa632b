//! Request/response shapes and JSON mapping helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use estoque_auth::Identity;
use estoque_core::UserId;
use estoque_inventory::{Autofill, DateRange};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub pin: String,
}

/// Identity as seen by clients: never the hash.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: UserId,
    pub username: String,
    pub is_master: bool,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            is_master: identity.is_master,
        }
    }
}

/// Query string for listing and export: optional date bounds plus the
/// free-text term applied to the fetched snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub q: Option<String>,
}

impl ListQuery {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub found: bool,
    pub descricao: Option<String>,
    pub codigo_barras: Option<String>,
}

impl ResolveResponse {
    pub fn from_lookup(hit: Option<Autofill>) -> Self {
        match hit {
            Some(autofill) => Self {
                found: true,
                descricao: autofill.descricao,
                codigo_barras: autofill.codigo_barras,
            },
            None => Self {
                found: false,
                descricao: None,
                codigo_barras: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub inserted: u64,
}
