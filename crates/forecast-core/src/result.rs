//! 預測結果模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 單一鍵值的預測結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// 物料或類別ID
    pub key: String,

    /// 顯示名稱
    pub display_name: String,

    /// 計量單位（僅按物料分組時）
    pub unit_of_measure: Option<String>,

    /// 區間內總量
    pub quantity_in_window: f64,

    /// 區間天數
    pub window_days: usize,

    /// 每日需求率
    pub daily_rate: f64,

    /// 時界內預測數量
    pub forecast_quantity: f64,

    /// 現有庫存
    pub stock_on_hand: f64,

    /// 距離缺貨天數（需求率不為正時為 0）
    pub days_until_shortage: f64,

    /// 預計缺貨日期
    pub shortage_date: Option<NaiveDate>,
}

impl ForecastResult {
    /// 是否屬於風險物料：`0 < days_until_shortage <= warn_threshold_days`
    pub fn is_at_risk(&self, warn_threshold_days: i64) -> bool {
        self.days_until_shortage > 0.0 && self.days_until_shortage <= warn_threshold_days as f64
    }
}

/// 彙總指標
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunKpis {
    pub total_items: usize,
    pub total_forecast_quantity: f64,
    pub total_on_hand: f64,
    pub at_risk_count: usize,
}

impl RunKpis {
    /// 從（已排名篩選的）結果彙總
    pub fn aggregate(results: &[ForecastResult], warn_threshold_days: i64) -> Self {
        Self {
            total_items: results.len(),
            total_forecast_quantity: results.iter().map(|r| r.forecast_quantity).sum(),
            total_on_hand: results.iter().map(|r| r.stock_on_hand).sum(),
            at_risk_count: results
                .iter()
                .filter(|r| r.is_at_risk(warn_threshold_days))
                .count(),
        }
    }
}

/// 單次執行的輸出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// 所屬執行ID
    pub run_id: Uuid,

    /// 已排名的結果
    pub results: Vec<ForecastResult>,

    /// 彙總指標
    pub kpis: RunKpis,

    /// 成功送出的預警數
    pub alerts_dispatched: usize,

    /// 送出失敗的預警數
    pub alerts_failed: usize,
}

impl RunResult {
    /// 創建空的執行結果
    pub fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            results: Vec::new(),
            kpis: RunKpis::default(),
            alerts_dispatched: 0,
            alerts_failed: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
