//! # Forecast Core
//!
//! 核心資料模型與類型定義

pub mod alert;
pub mod config;
pub mod naming;
pub mod record;
pub mod result;
pub mod series;

// Re-export 主要類型
pub use alert::{AlertChannels, ShortageAlert};
pub use config::{GroupMode, LocationScope, MethodKind, RunConfiguration};
pub use naming::repair_mojibake;
pub use record::{DemandSource, Direction, Movement, SaleLine, StockMove, TransactionRecord};
pub use result::{ForecastResult, RunKpis, RunResult};
pub use series::{DateWindow, DemandSeries};

use chrono::NaiveDate;

/// 預測錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("起始日期必須早於結束日期: {from} > {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("沒有可匯出的結果，請先執行計算")]
    EmptyResultSet,

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("讀取交易記錄失敗: {0}")]
    RecordSource(String),

    #[error("查詢現有庫存失敗 ({key}): {message}")]
    StockLookup { key: String, message: String },

    #[error("匯出錯誤: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
