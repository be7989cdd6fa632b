//! Product record, input shapes and their validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use estoque_core::{DomainError, DomainResult, Entity, ProductId, UserId};

/// A persisted product batch row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    /// Internal product identifier; the primary lookup key.
    pub codigo_pa: String,
    pub descricao: String,
    pub quantidade: u32,
    pub lote: String,
    pub validade: NaiveDate,
    pub codigo_barras: Option<String>,
    /// Identity that created the row. Absent for rows loaded out of band.
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Build a fresh row from validated input, stamped with `now`.
    pub fn stamped(new: NewProduct, owner_id: Option<UserId>, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            codigo_pa: new.codigo_pa,
            descricao: new.descricao,
            quantidade: new.quantidade,
            lote: new.lote,
            validade: new.validade,
            codigo_barras: new.codigo_barras,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for ProductRecord {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Read-only barcode lookup row, populated out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRef {
    pub codigo_barras: String,
    pub codigo_pa: Option<String>,
    pub descricao: Option<String>,
}

/// Validated create input; only ever produced by the form/draft validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub codigo_pa: String,
    pub descricao: String,
    pub quantidade: u32,
    pub lote: String,
    pub validade: NaiveDate,
    pub codigo_barras: Option<String>,
}

/// Form-shaped create input: everything arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub codigo_pa: String,
    pub descricao: String,
    pub quantidade: String,
    pub lote: String,
    /// ISO `YYYY-MM-DD`, as emitted by a date input.
    pub validade: String,
    #[serde(default)]
    pub codigo_barras: Option<String>,
}

impl ProductForm {
    /// Validate the form into a typed `NewProduct`.
    pub fn validate(self) -> DomainResult<NewProduct> {
        let codigo_pa = require_text(&self.codigo_pa, "codigo_pa")?;
        let descricao = require_text(&self.descricao, "descricao")?;
        let lote = require_text(&self.lote, "lote")?;

        let quantidade: u32 = self
            .quantidade
            .trim()
            .parse()
            .map_err(|_| DomainError::validation("quantidade must be a non-negative integer"))?;

        let validade: NaiveDate = self
            .validade
            .trim()
            .parse()
            .map_err(|_| DomainError::validation("validade must be a date (YYYY-MM-DD)"))?;

        Ok(NewProduct {
            codigo_pa,
            descricao,
            quantidade,
            lote,
            validade,
            codigo_barras: normalize_optional(self.codigo_barras),
        })
    }
}

/// One bulk-import row. Required and optional fields are explicit; anything
/// that does not conform is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub codigo_pa: String,
    pub descricao: String,
    #[serde(default)]
    pub quantidade: Option<i64>,
    #[serde(default)]
    pub lote: Option<String>,
    #[serde(default)]
    pub validade: Option<NaiveDate>,
    #[serde(default)]
    pub codigo_barras: Option<String>,
}

impl ProductDraft {
    /// Validate the draft into a typed `NewProduct`.
    ///
    /// `quantidade` defaults to 0 when absent and `lote` to empty;
    /// `validade` is required because the row cannot be stored without one.
    pub fn validate(self) -> DomainResult<NewProduct> {
        let codigo_pa = require_text(&self.codigo_pa, "codigo_pa")?;
        let descricao = require_text(&self.descricao, "descricao")?;

        let quantidade = match self.quantidade {
            None => 0,
            Some(q) => u32::try_from(q)
                .map_err(|_| DomainError::validation("quantidade must be a non-negative integer"))?,
        };

        let validade = self
            .validade
            .ok_or_else(|| DomainError::validation("validade is required"))?;

        Ok(NewProduct {
            codigo_pa,
            descricao,
            quantidade,
            lote: self.lote.unwrap_or_default(),
            validade,
            codigo_barras: normalize_optional(self.codigo_barras),
        })
    }
}

fn require_text(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn form() -> ProductForm {
        ProductForm {
            codigo_pa: "PA-100".to_string(),
            descricao: "Tinta acrílica azul".to_string(),
            quantidade: "25".to_string(),
            lote: "L-2024-07".to_string(),
            validade: "2026-06-30".to_string(),
            codigo_barras: Some("7891234567895".to_string()),
        }
    }

    #[test]
    fn valid_form_produces_typed_input() {
        let new = form().validate().unwrap();
        assert_eq!(new.codigo_pa, "PA-100");
        assert_eq!(new.quantidade, 25);
        assert_eq!(new.validade, NaiveDate::from_ymd_opt(2026, 6, 30).unwrap());
        assert_eq!(new.codigo_barras.as_deref(), Some("7891234567895"));
    }

    #[test]
    fn quantidade_must_parse_to_a_non_negative_integer() {
        for bad in ["-1", "abc", "2.5", ""] {
            let mut f = form();
            f.quantidade = bad.to_string();
            let err = f.validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "quantidade {bad:?}");
        }
    }

    #[test]
    fn mandatory_text_fields_are_trimmed_and_required() {
        let mut f = form();
        f.codigo_pa = "   ".to_string();
        assert!(f.validate().is_err());

        let mut f = form();
        f.codigo_pa = "  PA-7  ".to_string();
        assert_eq!(f.validate().unwrap().codigo_pa, "PA-7");
    }

    #[test]
    fn blank_barcode_collapses_to_absent() {
        let mut f = form();
        f.codigo_barras = Some("  ".to_string());
        assert_eq!(f.validate().unwrap().codigo_barras, None);
    }

    #[test]
    fn draft_defaults_quantity_and_lot_but_not_the_expiry() {
        let draft = ProductDraft {
            codigo_pa: "PA_MASTER_001".to_string(),
            descricao: "Tinta Acrílica Premium Azul".to_string(),
            quantidade: None,
            lote: None,
            validade: Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
            codigo_barras: None,
        };
        let new = draft.clone().validate().unwrap();
        assert_eq!(new.quantidade, 0);
        assert_eq!(new.lote, "");

        let err = ProductDraft {
            validade: None,
            ..draft
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn draft_rejects_negative_quantity() {
        let err = ProductDraft {
            codigo_pa: "PA-1".to_string(),
            descricao: "d".to_string(),
            quantidade: Some(-3),
            lote: None,
            validade: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            codigo_barras: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn draft_deserializes_with_missing_optional_fields() {
        let draft: ProductDraft = serde_json::from_str(
            r#"{"codigo_pa": "PA-9", "descricao": "Verniz", "validade": "2026-01-20"}"#,
        )
        .unwrap();
        assert_eq!(draft.quantidade, None);
        assert_eq!(draft.lote, None);
    }

    proptest! {
        #[test]
        fn any_non_negative_quantity_string_is_accepted(q in 0u32..=1_000_000) {
            let mut f = form();
            f.quantidade = q.to_string();
            prop_assert_eq!(f.validate().unwrap().quantidade, q);
        }
    }
}
