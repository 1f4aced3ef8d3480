//! 缺貨預警判斷

use forecast_core::ForecastResult;

/// 預警判斷器
pub struct AlertEvaluator;

impl AlertEvaluator {
    /// 篩出需要發送預警的結果
    pub fn evaluate(results: &[ForecastResult], warn_threshold_days: i64) -> Vec<&ForecastResult> {
        results
            .iter()
            .filter(|r| Self::qualifies(r, warn_threshold_days))
            .collect()
    }

    /// 距離缺貨天數非零且不超過預警天數
    ///
    /// 天數為零代表需求率不為正，永遠不預警（即使預警天數為零）。
    pub fn qualifies(result: &ForecastResult, warn_threshold_days: i64) -> bool {
        result.days_until_shortage != 0.0
            && result.days_until_shortage <= warn_threshold_days as f64
    }
}
