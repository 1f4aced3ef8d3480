//! 預測執行（主計算流程）

use chrono::Local;
use forecast_core::{
    repair_mojibake, DemandSeries, ForecastResult, GroupMode, RunConfiguration, RunKpis,
    RunResult, ShortageAlert,
};
use uuid::Uuid;

use crate::alerting::AlertEvaluator;
use crate::collaborators::RunContext;
use crate::method::ForecastMethod;
use crate::ranking::RankingSelector;
use crate::series_builder::DemandSeriesBuilder;
use crate::shortage::ShortageProjector;

/// 執行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// 草稿（尚未計算或計算失敗）
    Draft,
    /// 計算中
    Computing,
    /// 已完成
    Ready,
}

/// 預測執行
///
/// 持有一份配置與最近一次的計算結果；重新計算會整批取代舊結果。
#[derive(Debug, Clone)]
pub struct ForecastRun {
    id: Uuid,
    name: String,
    config: RunConfiguration,
    state: RunState,
    result: Option<RunResult>,
}

impl ForecastRun {
    /// 創建新的預測執行
    pub fn new(config: RunConfiguration) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("Run @ {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
            config,
            state: RunState::Draft,
            result: None,
        }
    }

    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 最近一次的計算結果
    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    /// 目前的結果筆數
    pub fn line_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.results.len())
    }

    /// 主計算入口
    ///
    /// 失敗時回到計算前的狀態並保留舊結果。
    pub fn compute(&mut self, ctx: &RunContext<'_>) -> forecast_core::Result<&RunResult> {
        self.config.validate()?;

        let previous_state = self.state;
        self.state = RunState::Computing;

        let run_result = match self.compute_result(ctx) {
            Ok(run_result) => run_result,
            Err(e) => {
                tracing::warn!("預測執行 {} 失敗: {}", self.id, e);
                self.state = previous_state;
                return Err(e);
            }
        };

        self.state = RunState::Ready;
        Ok(&*self.result.insert(run_result))
    }

    fn compute_result(&self, ctx: &RunContext<'_>) -> forecast_core::Result<RunResult> {
        let config = &self.config;
        let start_time = std::time::Instant::now();

        tracing::info!(
            "開始預測計算: {} ~ {}, 方法 {:?}, 分組 {:?}",
            config.date_from,
            config.date_to,
            config.method,
            config.group_by
        );

        // Step 1: 讀取交易記錄並建立每日序列
        tracing::debug!("Step 1: 建立需求序列");
        let records = ctx.records.fetch_transaction_records(config)?;
        let series_by_key = DemandSeriesBuilder::from_config(config)?.build(&records);
        tracing::debug!("交易記錄 {} 筆, 鍵值 {} 個", records.len(), series_by_key.len());

        // Step 2: 逐鍵值計算需求率與缺貨推算
        tracing::debug!("Step 2: 逐鍵值計算");
        let method = ForecastMethod::from_config(config);
        let today = config.today();
        let mut rows = Vec::with_capacity(series_by_key.len());
        for series in series_by_key.values() {
            rows.push(self.forecast_key(series, method, today, ctx)?);
        }

        // Step 3: 排名與截取
        tracing::debug!("Step 3: 排名篩選 (top_n = {})", config.top_n);
        let selected = RankingSelector::select(rows, config.top_n);

        // Step 4: 彙總指標
        let kpis = RunKpis::aggregate(&selected, config.warn_threshold_days);

        // Step 5: 預警
        tracing::debug!("Step 4: 缺貨預警");
        let (alerts_dispatched, alerts_failed) = self.post_alerts(&selected, ctx);

        tracing::info!("預測計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "結果 {} 筆, 風險 {} 筆, 預警送出 {} 筆, 失敗 {} 筆",
            kpis.total_items,
            kpis.at_risk_count,
            alerts_dispatched,
            alerts_failed
        );

        Ok(RunResult {
            run_id: self.id,
            results: selected,
            kpis,
            alerts_dispatched,
            alerts_failed,
        })
    }

    /// 單一鍵值的預測
    fn forecast_key(
        &self,
        series: &DemandSeries,
        method: ForecastMethod,
        today: chrono::NaiveDate,
        ctx: &RunContext<'_>,
    ) -> forecast_core::Result<ForecastResult> {
        let config = &self.config;
        let key = series.key.as_str();

        let daily_rate = method.rate(series.values());
        let stock_on_hand = ctx.stock.fetch_stock_on_hand(key, config)?;
        let projection =
            ShortageProjector::project(daily_rate, stock_on_hand, config.horizon_days, today);

        let display_name = ctx
            .catalog
            .resolve_display_name(key, config.group_by)
            .map(|name| repair_mojibake(&name))
            .unwrap_or_else(|| key.to_string());

        let unit_of_measure = match config.group_by {
            GroupMode::Item => ctx.catalog.resolve_unit_of_measure(key, config.group_by),
            GroupMode::Category => None,
        };

        tracing::debug!(
            "{}: 需求率 {:.4}, 庫存 {}, 缺貨天數 {:.2}",
            key,
            daily_rate,
            stock_on_hand,
            projection.days_until_shortage
        );

        Ok(ForecastResult {
            key: key.to_string(),
            display_name,
            unit_of_measure,
            quantity_in_window: series.total(),
            window_days: series.len(),
            daily_rate,
            forecast_quantity: projection.forecast_quantity,
            stock_on_hand,
            days_until_shortage: projection.days_until_shortage,
            shortage_date: projection.shortage_date,
        })
    }

    /// 發送預警，返回 (成功, 失敗) 筆數；失敗不影響計算結果
    fn post_alerts(&self, results: &[ForecastResult], ctx: &RunContext<'_>) -> (usize, usize) {
        let channels = self.config.alert_channels;
        if !channels.any() {
            return (0, 0);
        }

        let mut dispatched = 0;
        let mut failed = 0;
        for result in AlertEvaluator::evaluate(results, self.config.warn_threshold_days) {
            let alert = ShortageAlert::from_result(result, channels);
            match ctx.alerts.dispatch_alert(&alert, &self.config) {
                Ok(()) => dispatched += 1,
                Err(e) => {
                    tracing::warn!("{}", e);
                    failed += 1;
                }
            }
        }

        (dispatched, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{AlertSink, DispatchError, KeyCatalog, RecordSource, StockLedger};
    use chrono::NaiveDate;
    use forecast_core::{
        AlertChannels, DemandSource, ForecastError, MethodKind, Movement, TransactionRecord,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    struct Fixture {
        records: Vec<TransactionRecord>,
        stock: HashMap<String, f64>,
        names: HashMap<String, String>,
        fail_records: bool,
        fail_stock: bool,
        sent: Mutex<Vec<ShortageAlert>>,
        fail_alerts: bool,
    }

    impl Fixture {
        fn new(records: Vec<TransactionRecord>) -> Self {
            Self {
                records,
                stock: HashMap::new(),
                names: HashMap::new(),
                fail_records: false,
                fail_stock: false,
                sent: Mutex::new(Vec::new()),
                fail_alerts: false,
            }
        }

        fn with_stock(mut self, key: &str, qty: f64) -> Self {
            self.stock.insert(key.to_string(), qty);
            self
        }

        fn ctx(&self) -> RunContext<'_> {
            RunContext::new(self, self, self, self)
        }
    }

    impl RecordSource for Fixture {
        fn fetch_transaction_records(
            &self,
            _config: &RunConfiguration,
        ) -> forecast_core::Result<Vec<TransactionRecord>> {
            if self.fail_records {
                return Err(ForecastError::RecordSource("資料庫離線".to_string()));
            }
            Ok(self.records.clone())
        }
    }

    impl StockLedger for Fixture {
        fn fetch_stock_on_hand(
            &self,
            key: &str,
            _config: &RunConfiguration,
        ) -> forecast_core::Result<f64> {
            if self.fail_stock {
                return Err(ForecastError::StockLookup {
                    key: key.to_string(),
                    message: "庫位查詢逾時".to_string(),
                });
            }
            Ok(self.stock.get(key).copied().unwrap_or(0.0))
        }
    }

    impl KeyCatalog for Fixture {
        fn resolve_display_name(&self, key: &str, _group_mode: GroupMode) -> Option<String> {
            self.names.get(key).cloned()
        }

        fn resolve_unit_of_measure(&self, _key: &str, _group_mode: GroupMode) -> Option<String> {
            Some("Units".to_string())
        }
    }

    impl AlertSink for Fixture {
        fn dispatch_alert(
            &self,
            alert: &ShortageAlert,
            _config: &RunConfiguration,
        ) -> Result<(), DispatchError> {
            if self.fail_alerts {
                return Err(DispatchError::new(alert.key.clone(), "SMTP 逾時"));
            }
            self.sent.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn outgoing(item: &str, d: u32, qty: f64) -> TransactionRecord {
        TransactionRecord::new(item.to_string(), day(d), qty)
            .with_movement(Movement::new(true, false))
    }

    fn stock_config() -> RunConfiguration {
        RunConfiguration::new(day(1), day(3))
            .with_source(DemandSource::StockMoves)
            .with_horizon_days(10)
            .with_as_of(day(20))
    }

    #[test]
    fn test_end_to_end_sma() {
        let records = vec![outgoing("BIKE-001", 1, 2.0), outgoing("BIKE-001", 3, 4.0)];
        let fixture = Fixture::new(records).with_stock("BIKE-001", 18.0);

        let mut run = ForecastRun::new(stock_config());
        let result = run.compute(&fixture.ctx()).unwrap().clone();

        assert_eq!(run.state(), RunState::Ready);
        assert_eq!(result.results.len(), 1);

        let row = &result.results[0];
        assert_eq!(row.key, "BIKE-001");
        assert_eq!(row.display_name, "BIKE-001");
        assert_eq!(row.unit_of_measure.as_deref(), Some("Units"));
        assert_eq!(row.quantity_in_window, 6.0);
        assert_eq!(row.window_days, 3);
        assert_eq!(row.daily_rate, 2.0);
        assert_eq!(row.forecast_quantity, 20.0);
        assert_eq!(row.days_until_shortage, 9.0);
        assert_eq!(row.shortage_date, Some(day(29)));
    }

    #[test]
    fn test_invalid_range_stays_draft() {
        let fixture = Fixture::new(vec![]);
        let mut run = ForecastRun::new(RunConfiguration::new(day(5), day(1)));

        let err = run.compute(&fixture.ctx()).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidRange { .. }));
        assert_eq!(run.state(), RunState::Draft);
        assert!(run.result().is_none());
    }

    #[test]
    fn test_recompute_replaces_rows() {
        let fixture = Fixture::new(vec![outgoing("A", 1, 1.0), outgoing("B", 2, 3.0)]);
        let mut run = ForecastRun::new(stock_config());

        let first = run.compute(&fixture.ctx()).unwrap().clone();
        let second = run.compute(&fixture.ctx()).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(run.line_count(), 2);
    }

    #[test]
    fn test_source_failure_keeps_previous_result() {
        let mut fixture = Fixture::new(vec![outgoing("A", 1, 1.0)]);
        let mut run = ForecastRun::new(stock_config());
        run.compute(&fixture.ctx()).unwrap();

        fixture.fail_records = true;
        let err = run.compute(&fixture.ctx()).unwrap_err();

        assert!(matches!(err, ForecastError::RecordSource(_)));
        assert_eq!(run.state(), RunState::Ready);
        assert_eq!(run.line_count(), 1);
    }

    #[test]
    fn test_stock_failure_keeps_previous_result() {
        let mut fixture = Fixture::new(vec![outgoing("A", 1, 1.0), outgoing("B", 2, 3.0)]);
        let mut run = ForecastRun::new(stock_config());
        let before = run.compute(&fixture.ctx()).unwrap().clone();

        fixture.fail_stock = true;
        let err = run.compute(&fixture.ctx()).unwrap_err();

        match err {
            ForecastError::StockLookup { key, .. } => assert_eq!(key, "A"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(run.state(), RunState::Ready);
        assert_eq!(run.line_count(), 2);
        assert_eq!(run.result(), Some(&before));
    }

    #[test]
    fn test_stock_failure_on_first_compute_stays_draft() {
        let mut fixture = Fixture::new(vec![outgoing("A", 1, 1.0)]);
        fixture.fail_stock = true;

        let mut run = ForecastRun::new(stock_config());
        assert!(run.compute(&fixture.ctx()).is_err());
        assert_eq!(run.state(), RunState::Draft);
        assert!(run.result().is_none());
    }

    #[test]
    fn test_category_rows_have_no_unit() {
        let record = TransactionRecord::new("A".to_string(), day(1), 3.0)
            .with_category_id("BIKES".to_string());
        let fixture = Fixture::new(vec![record]);
        let config = RunConfiguration::new(day(1), day(3)).with_group_by(GroupMode::Category);

        let mut run = ForecastRun::new(config);
        let result = run.compute(&fixture.ctx()).unwrap();

        assert_eq!(result.results[0].key, "BIKES");
        assert!(result.results[0].unit_of_measure.is_none());
    }

    #[test]
    fn test_display_name_repaired() {
        let mut fixture = Fixture::new(vec![TransactionRecord::new("A".to_string(), day(1), 1.0)]);
        fixture.names.insert("A".to_string(), "CafÃ©".to_string());

        let mut run = ForecastRun::new(RunConfiguration::new(day(1), day(1)));
        let result = run.compute(&fixture.ctx()).unwrap();

        assert_eq!(result.results[0].display_name, "Café");
    }

    #[test]
    fn test_alerts_only_when_channel_enabled() {
        let records = vec![TransactionRecord::new("A".to_string(), day(1), 3.0)];
        let config = RunConfiguration::new(day(1), day(3))
            .with_method(MethodKind::Sma)
            .with_as_of(day(3));

        let fixture = Fixture::new(records.clone()).with_stock("A", 2.0);
        let mut run = ForecastRun::new(config.clone());
        let result = run.compute(&fixture.ctx()).unwrap();
        assert_eq!(result.kpis.at_risk_count, 1);
        assert_eq!(result.alerts_dispatched, 0);
        assert!(fixture.sent.lock().unwrap().is_empty());

        let fixture = Fixture::new(records).with_stock("A", 2.0);
        let mut run =
            ForecastRun::new(config.with_alert_channels(AlertChannels::new(true, false)));
        let result = run.compute(&fixture.ctx()).unwrap();
        assert_eq!(result.alerts_dispatched, 1);

        let sent = fixture.sent.lock().unwrap();
        assert_eq!(sent[0].summary, "Low-stock alert: A");
    }

    #[test]
    fn test_alert_failures_do_not_fail_run() {
        let records = vec![TransactionRecord::new("A".to_string(), day(1), 3.0)];
        let mut fixture = Fixture::new(records).with_stock("A", 2.0);
        fixture.fail_alerts = true;

        let config = RunConfiguration::new(day(1), day(3))
            .with_alert_channels(AlertChannels::new(false, true));
        let mut run = ForecastRun::new(config);
        let result = run.compute(&fixture.ctx()).unwrap();

        assert_eq!(result.alerts_dispatched, 0);
        assert_eq!(result.alerts_failed, 1);
        assert_eq!(run.state(), RunState::Ready);
    }
}
