//! 缺貨預警模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::result::ForecastResult;

/// 預警通知管道
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertChannels {
    /// 建立待辦活動
    pub create_activities: bool,

    /// 寄送郵件給目前使用者
    pub send_email: bool,
}

impl AlertChannels {
    pub fn new(create_activities: bool, send_email: bool) -> Self {
        Self {
            create_activities,
            send_email,
        }
    }

    /// 是否啟用任一管道
    pub fn any(&self) -> bool {
        self.create_activities || self.send_email
    }
}

/// 待送出的缺貨預警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageAlert {
    pub key: String,
    pub summary: String,
    pub note: String,
    pub days_until_shortage: f64,
    pub shortage_date: Option<NaiveDate>,
    pub channels: AlertChannels,
}

impl ShortageAlert {
    /// 從預測結果產生預警內容
    pub fn from_result(result: &ForecastResult, channels: AlertChannels) -> Self {
        let shortage_date = result
            .shortage_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            key: result.key.clone(),
            summary: format!("Low-stock alert: {}", result.display_name),
            note: format!(
                "On hand: {:.2}, Daily rate: {:.4}, Shortage date: {}",
                result.stock_on_hand, result.daily_rate, shortage_date
            ),
            days_until_shortage: result.days_until_shortage,
            shortage_date: result.shortage_date,
            channels,
        }
    }
}
