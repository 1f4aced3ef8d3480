//! 每日需求序列建構

use std::collections::BTreeMap;

use forecast_core::{
    DateWindow, DemandSeries, DemandSource, Direction, GroupMode, RunConfiguration,
    TransactionRecord,
};

/// 需求序列建構器
///
/// 將不規則的交易記錄轉成每個鍵值一條、逐日完整的需求序列。
#[derive(Debug, Clone)]
pub struct DemandSeriesBuilder {
    window: DateWindow,
    group_by: GroupMode,
    source: DemandSource,
    include_returns: bool,
}

impl DemandSeriesBuilder {
    /// 創建建構器（預設銷售明細來源、計入退貨）
    pub fn new(window: DateWindow, group_by: GroupMode) -> Self {
        Self {
            window,
            group_by,
            source: DemandSource::SalesLines,
            include_returns: true,
        }
    }

    /// 從執行配置創建，日期區間無效時失敗
    pub fn from_config(config: &RunConfiguration) -> forecast_core::Result<Self> {
        Ok(Self::new(config.window()?, config.group_by)
            .with_source(config.source)
            .with_include_returns(config.include_returns))
    }

    /// 建構器模式：設置資料來源
    pub fn with_source(mut self, source: DemandSource) -> Self {
        self.source = source;
        self
    }

    /// 建構器模式：設置是否計入退貨
    pub fn with_include_returns(mut self, include: bool) -> Self {
        self.include_returns = include;
        self
    }

    /// 建構需求序列
    ///
    /// 只有在區間內出現過有效記錄的鍵值才會出現在結果中。
    pub fn build(&self, records: &[TransactionRecord]) -> BTreeMap<String, DemandSeries> {
        let mut series: BTreeMap<String, DemandSeries> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            if !self.window.contains(record.date) {
                skipped += 1;
                continue;
            }

            let Some(key) = self.key_for(record) else {
                tracing::debug!("記錄 {} 沒有類別，跳過", record.item_id);
                skipped += 1;
                continue;
            };

            let Some(delta) = self.delta_for(record) else {
                continue;
            };

            series
                .entry(key.to_string())
                .or_insert_with(|| DemandSeries::zeros(key.to_string(), self.window))
                .add(record.date, delta);
        }

        tracing::debug!(
            "需求序列: 記錄 {} 筆, 跳過 {} 筆, 鍵值 {} 個, 天數 {}",
            records.len(),
            skipped,
            series.len(),
            self.window.days()
        );

        series
    }

    /// 依分組方式取得鍵值
    fn key_for<'a>(&self, record: &'a TransactionRecord) -> Option<&'a str> {
        match self.group_by {
            GroupMode::Item => Some(record.item_id.as_str()),
            GroupMode::Category => record.category_id.as_deref(),
        }
    }

    /// 記錄對需求的貢獻；不貢獻時返回 None
    fn delta_for(&self, record: &TransactionRecord) -> Option<f64> {
        match self.source {
            DemandSource::SalesLines => Some(record.quantity),
            DemandSource::StockMoves => {
                let Some(direction) = record.direction() else {
                    tracing::warn!("庫存異動記錄 {} 缺少庫位旗標，跳過", record.item_id);
                    return None;
                };

                let delta = match direction {
                    Direction::Outgoing => record.quantity,
                    Direction::Incoming if self.include_returns => -record.quantity,
                    Direction::Incoming | Direction::Transfer => 0.0,
                };

                if delta == 0.0 {
                    None
                } else {
                    Some(delta)
                }
            }
        }
    }
}
