//! 排名篩選

use std::cmp::Ordering;

use forecast_core::ForecastResult;

/// 排名篩選器
pub struct RankingSelector;

impl RankingSelector {
    /// 按預測數量由大到小排序（穩定排序），`top_n > 0` 時截取前 N 筆
    ///
    /// NaN 一律排在最後。
    pub fn select(mut results: Vec<ForecastResult>, top_n: i64) -> Vec<ForecastResult> {
        results.sort_by(|a, b| descending(a.forecast_quantity, b.forecast_quantity));

        if top_n > 0 {
            results.truncate(top_n as usize);
        }

        results
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
