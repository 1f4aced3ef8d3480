//! 外部協作介面
//!
//! 記錄查詢、庫存查詢、名稱解析與預警發送都由呼叫端實作，
//! 計算引擎只依賴這些介面，不持有任何全域狀態。

use forecast_core::{GroupMode, RunConfiguration, ShortageAlert, TransactionRecord};

/// 預警發送錯誤
#[derive(Debug, thiserror::Error)]
#[error("預警發送失敗 ({key}): {message}")]
pub struct DispatchError {
    pub key: String,
    pub message: String,
}

impl DispatchError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// 交易記錄來源
pub trait RecordSource: Send + Sync {
    /// 依配置（日期區間、公司、類別/倉庫篩選、資料來源）取得交易記錄
    fn fetch_transaction_records(
        &self,
        config: &RunConfiguration,
    ) -> forecast_core::Result<Vec<TransactionRecord>>;
}

/// 現有庫存查詢
pub trait StockLedger: Send + Sync {
    /// 以相同的庫位範圍查詢鍵值的現有庫存
    fn fetch_stock_on_hand(&self, key: &str, config: &RunConfiguration)
        -> forecast_core::Result<f64>;
}

/// 名稱與計量單位解析
pub trait KeyCatalog: Send + Sync {
    fn resolve_display_name(&self, key: &str, group_mode: GroupMode) -> Option<String>;

    fn resolve_unit_of_measure(&self, key: &str, group_mode: GroupMode) -> Option<String>;
}

/// 預警發送（盡力而為）
pub trait AlertSink: Send + Sync {
    fn dispatch_alert(
        &self,
        alert: &ShortageAlert,
        config: &RunConfiguration,
    ) -> Result<(), DispatchError>;
}

/// 不發送任何預警
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn dispatch_alert(
        &self,
        _alert: &ShortageAlert,
        _config: &RunConfiguration,
    ) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// 單次計算所需的外部協作者
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub records: &'a dyn RecordSource,
    pub stock: &'a dyn StockLedger,
    pub catalog: &'a dyn KeyCatalog,
    pub alerts: &'a dyn AlertSink,
}

impl<'a> RunContext<'a> {
    pub fn new(
        records: &'a dyn RecordSource,
        stock: &'a dyn StockLedger,
        catalog: &'a dyn KeyCatalog,
        alerts: &'a dyn AlertSink,
    ) -> Self {
        Self {
            records,
            stock,
            catalog,
            alerts,
        }
    }
}
