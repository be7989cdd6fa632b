//! `estoque-export` — projection of product snapshots into XLSX artifacts.

pub mod spreadsheet;

pub use spreadsheet::{export_filename, to_spreadsheet};
