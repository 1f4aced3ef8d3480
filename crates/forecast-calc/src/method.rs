//! 預測方法實現

use forecast_core::{MethodKind, RunConfiguration};

/// 預測方法：將每日序列化約成單一每日需求率
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastMethod {
    /// 簡單移動平均（全序列平均）
    Sma,
    /// 加權移動平均（最近 `window` 天，越新權重越高）
    Wma { window: i64 },
    /// 簡單指數平滑（以第一筆觀測值為初始值）
    Ets { alpha: f64 },
}

impl ForecastMethod {
    /// 依配置選擇預測方法，ETS 係數已正規化
    pub fn from_config(config: &RunConfiguration) -> Self {
        match config.method {
            MethodKind::Sma => ForecastMethod::Sma,
            MethodKind::Wma => ForecastMethod::Wma {
                window: config.wma_window,
            },
            MethodKind::Ets => ForecastMethod::Ets {
                alpha: config.normalized_ets_alpha(),
            },
        }
    }

    /// 計算每日需求率
    pub fn rate(&self, values: &[f64]) -> f64 {
        match *self {
            ForecastMethod::Sma => Self::simple_moving_average(values),
            ForecastMethod::Wma { window } => Self::weighted_moving_average(values, window),
            ForecastMethod::Ets { alpha } => Self::exponential_smoothing(values, alpha),
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            ForecastMethod::Sma => MethodKind::Sma,
            ForecastMethod::Wma { .. } => MethodKind::Wma,
            ForecastMethod::Ets { .. } => MethodKind::Ets,
        }
    }

    fn simple_moving_average(values: &[f64]) -> f64 {
        let n = values.len().max(1);
        values.iter().sum::<f64>() / n as f64
    }

    /// 權重 1..=w 由舊到新分配在最後 w 筆上
    fn weighted_moving_average(values: &[f64], window: i64) -> f64 {
        if window <= 0 || values.is_empty() {
            return 0.0;
        }

        let w = (window as usize).min(values.len());
        let recent = &values[values.len() - w..];

        let numerator: f64 = recent
            .iter()
            .enumerate()
            .map(|(i, v)| v * (i + 1) as f64)
            .sum();
        let denominator = (w * (w + 1) / 2) as f64;

        if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        }
    }

    fn exponential_smoothing(values: &[f64], alpha: f64) -> f64 {
        let mut iter = values.iter();
        let Some(&first) = iter.next() else {
            return 0.0;
        };

        iter.fold(first, |s, &v| alpha * v + (1.0 - alpha) * s)
    }
}
