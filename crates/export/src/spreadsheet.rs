//! Rows → single-sheet XLSX workbook.
//!
//! Pure projection: no I/O here, the caller decides what to do with the
//! bytes. Output is deterministic for identical inputs — the workbook
//! creation timestamp is pinned, everything else is a function of the rows.

use chrono::NaiveDate;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, XlsxError};

use estoque_core::{DomainError, DomainResult, UserId};
use estoque_inventory::{DateRange, ProductRecord};

const SHEET_NAME: &str = "Produtos";

const HEADERS: [&str; 8] = [
    "Código PA",
    "Descrição",
    "Quantidade",
    "Lote",
    "Validade",
    "Código de Barras",
    "Data Criação",
    "Adicionado Por",
];

/// Project the filtered snapshot into workbook bytes.
///
/// Fixed column order per `HEADERS`; dates are rendered dd/mm/yyyy; the
/// owner column shows the resolved username, "Desconhecido" when the owner
/// key no longer resolves, "N/A" when the row has no owner.
pub fn to_spreadsheet<F>(rows: &[ProductRecord], owner_name: F) -> DomainResult<Vec<u8>>
where
    F: Fn(UserId) -> Option<String>,
{
    let mut workbook = Workbook::new();
    let creation = ExcelDateTime::from_ymd(2024, 1, 1).map_err(xlsx_err)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&creation));

    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    for (col, title) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *title, &bold)
            .map_err(xlsx_err)?;
    }

    for (i, record) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        let owner = match record.owner_id {
            Some(id) => owner_name(id).unwrap_or_else(|| "Desconhecido".to_string()),
            None => "N/A".to_string(),
        };

        worksheet
            .write_string(row, 0, &record.codigo_pa)
            .and_then(|w| w.write_string(row, 1, &record.descricao))
            .and_then(|w| w.write_number(row, 2, f64::from(record.quantidade)))
            .and_then(|w| w.write_string(row, 3, &record.lote))
            .and_then(|w| w.write_string(row, 4, format_date(record.validade)))
            .and_then(|w| {
                w.write_string(row, 5, record.codigo_barras.as_deref().unwrap_or(""))
            })
            .and_then(|w| {
                w.write_string(row, 6, format_date(record.created_at.date_naive()))
            })
            .and_then(|w| w.write_string(row, 7, owner))
            .map_err(xlsx_err)?;
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

/// Download name derived from the active date filter, as the original UI
/// named its exports: `produtos_<start>_<end>.xlsx`, `produtos_apos_…`,
/// `produtos_ate_…`, or `produtos_<today>.xlsx` with no filter.
pub fn export_filename(range: &DateRange, today: NaiveDate) -> String {
    let compact = |d: NaiveDate| d.format("%Y%m%d").to_string();
    match (range.start, range.end) {
        (Some(start), Some(end)) => format!("produtos_{}_{}.xlsx", compact(start), compact(end)),
        (Some(start), None) => format!("produtos_apos_{}.xlsx", compact(start)),
        (None, Some(end)) => format!("produtos_ate_{}.xlsx", compact(end)),
        (None, None) => format!("produtos_{}.xlsx", today.format("%Y-%m-%d")),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn xlsx_err(e: XlsxError) -> DomainError {
    DomainError::storage(format!("spreadsheet: {e}"))
}
