//! PA-code lookup across the barcode reference table and existing products.

use std::sync::Arc;

use estoque_core::DomainResult;

use crate::store::{BarcodeStore, ProductStore};

/// Fields an existing row can contribute to a draft form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autofill {
    pub descricao: Option<String>,
    pub codigo_barras: Option<String>,
}

/// Resolves a candidate PA code with defined precedence: the barcode
/// reference table wins over previously entered product rows.
pub struct ProductResolver {
    barcodes: Arc<dyn BarcodeStore>,
    products: Arc<dyn ProductStore>,
}

impl ProductResolver {
    pub fn new(barcodes: Arc<dyn BarcodeStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { barcodes, products }
    }

    /// Look the code up; `None` means "no autofill available", not an error.
    ///
    /// Product-table fallback is global (not owner-scoped) and ties between
    /// duplicate PA codes break to the most recent `created_at`.
    pub async fn resolve(&self, codigo_pa: &str) -> DomainResult<Option<Autofill>> {
        let code = codigo_pa.trim();
        if code.is_empty() {
            return Ok(None);
        }

        if let Some(reference) = self.barcodes.find_by_pa(code).await? {
            tracing::debug!(codigo_pa = code, "resolved from barcode reference");
            return Ok(Some(Autofill {
                descricao: reference.descricao,
                codigo_barras: Some(reference.codigo_barras),
            }));
        }

        if let Some(product) = self.products.find_latest_by_pa(code).await? {
            tracing::debug!(codigo_pa = code, "resolved from existing product");
            return Ok(Some(Autofill {
                descricao: Some(product.descricao),
                codigo_barras: product.codigo_barras,
            }));
        }

        tracing::debug!(codigo_pa = code, "no match");
        Ok(None)
    }
}
