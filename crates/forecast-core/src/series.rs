//! 每日需求時間序列

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ForecastError;

/// 日期區間（含首尾）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// 創建日期區間，`from > to` 時失敗
    pub fn new(from: NaiveDate, to: NaiveDate) -> crate::Result<Self> {
        if from > to {
            return Err(ForecastError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// 區間天數
    pub fn days(&self) -> usize {
        ((self.to - self.from).num_days() + 1) as usize
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// 日期在區間內的索引
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.from).num_days() as usize)
        } else {
            None
        }
    }

    /// 逐日迭代
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.from.iter_days().take(self.days())
    }
}

#[derive(Deserialize)]
struct RawWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawWindow> for DateWindow {
    type Error = ForecastError;

    fn try_from(raw: RawWindow) -> crate::Result<Self> {
        Self::new(raw.from, raw.to)
    }
}

/// 單一鍵值的每日需求序列
///
/// 區間內每一天都有一筆數值，無記錄的日子補 0.0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct DemandSeries {
    /// 物料或類別ID
    pub key: String,

    window: DateWindow,

    values: Vec<f64>,
}

impl DemandSeries {
    /// 創建全為零的序列
    pub fn zeros(key: String, window: DateWindow) -> Self {
        Self {
            key,
            window,
            values: vec![0.0; window.days()],
        }
    }

    /// 累加某日的數量；區間外的日期忽略並返回 false
    pub fn add(&mut self, date: NaiveDate, quantity: f64) -> bool {
        match self.window.offset_of(date) {
            Some(idx) => {
                self.values[idx] += quantity;
                true
            }
            None => false,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// 依日期排序的數值
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 區間內總量
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.window.offset_of(date).map(|idx| self.values[idx])
    }

    /// (日期, 數量) 迭代
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.window.iter_days().zip(self.values.iter().copied())
    }
}

#[derive(Deserialize)]
struct RawSeries {
    key: String,
    window: DateWindow,
    values: Vec<f64>,
}

impl TryFrom<RawSeries> for DemandSeries {
    type Error = ForecastError;

    /// 每日一筆：數值筆數必須等於區間天數
    fn try_from(raw: RawSeries) -> crate::Result<Self> {
        if raw.values.len() != raw.window.days() {
            return Err(ForecastError::InvalidConfig(format!(
                "序列 {} 有 {} 筆數值，區間為 {} 天",
                raw.key,
                raw.values.len(),
                raw.window.days()
            )));
        }
        Ok(Self {
            key: raw.key,
            window: raw.window,
            values: raw.values,
        })
    }
}
