//! 缺貨日期推算

use chrono::{Days, NaiveDate};

/// 推算結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// 時界內預測數量（需求率為負時可為負）
    pub forecast_quantity: f64,
    /// 距離缺貨天數
    pub days_until_shortage: f64,
    /// 預計缺貨日期
    pub shortage_date: Option<NaiveDate>,
}

/// 缺貨推算器
pub struct ShortageProjector;

impl ShortageProjector {
    /// 推算預測數量與缺貨日期
    ///
    /// 只有需求率與現有庫存皆為正時才給出缺貨日期；庫存為零的物料
    /// 雖已缺貨，也不給日期。
    pub fn project(
        daily_rate: f64,
        stock_on_hand: f64,
        horizon_days: u32,
        today: NaiveDate,
    ) -> Projection {
        let forecast_quantity = daily_rate * f64::from(horizon_days);

        let days_until_shortage = if daily_rate > 0.0 {
            stock_on_hand / daily_rate
        } else {
            0.0
        };

        let shortage_date = if daily_rate > 0.0 && stock_on_hand > 0.0 {
            // 取整數天（捨去小數）
            today.checked_add_days(Days::new(days_until_shortage as u64))
        } else {
            None
        };

        Projection {
            forecast_quantity,
            days_until_shortage,
            shortage_date,
        }
    }
}
