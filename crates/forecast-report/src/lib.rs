//! # Forecast Report
//!
//! 匯出與報表（只讀取已計算的結果，所有四捨五入都在這一層）

pub mod export;
pub mod report;

// Re-export 主要類型
pub use export::{ExportRow, ExportTable, EXPORT_HEADERS};
pub use report::render_report;
