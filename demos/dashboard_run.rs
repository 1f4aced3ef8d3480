//! 預測儀表板示例：庫存異動 → 預測 → 排名 → 預警 → 匯出

use std::collections::HashMap;

use anyhow::Context;
use chrono::NaiveDate;
use forecast::forecast_core::{
    AlertChannels, DemandSource, ShortageAlert, StockMove, TransactionRecord,
};
use forecast::*;

struct DemoErp {
    moves: Vec<StockMove>,
    on_hand: HashMap<&'static str, f64>,
}

impl RecordSource for DemoErp {
    fn fetch_transaction_records(
        &self,
        _config: &RunConfiguration,
    ) -> forecast::Result<Vec<TransactionRecord>> {
        Ok(self.moves.iter().map(StockMove::to_record).collect())
    }
}

impl StockLedger for DemoErp {
    fn fetch_stock_on_hand(&self, key: &str, _config: &RunConfiguration) -> forecast::Result<f64> {
        Ok(self.on_hand.get(key).copied().unwrap_or(0.0))
    }
}

impl KeyCatalog for DemoErp {
    fn resolve_display_name(&self, key: &str, _group_mode: GroupMode) -> Option<String> {
        Some(format!("[{}] demo item", key))
    }

    fn resolve_unit_of_measure(&self, _key: &str, _group_mode: GroupMode) -> Option<String> {
        Some("Units".to_string())
    }
}

impl AlertSink for DemoErp {
    fn dispatch_alert(
        &self,
        alert: &ShortageAlert,
        _config: &RunConfiguration,
    ) -> std::result::Result<(), DispatchError> {
        println!("  ! {} ({})", alert.summary, alert.note);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== 預測儀表板示例 ===\n");

    let date_from = NaiveDate::from_ymd_opt(2025, 11, 1).context("無效的起始日期")?;
    let date_to = NaiveDate::from_ymd_opt(2025, 11, 14).context("無效的結束日期")?;

    let mut moves = Vec::new();
    for (offset, date) in date_from.iter_days().take(14).enumerate() {
        moves.push(StockMove {
            item_id: "BIKE-001".to_string(),
            category_id: Some("BIKES".to_string()),
            date,
            quantity: 2.0 + (offset % 3) as f64,
            source_internal: true,
            destination_internal: false,
        });
        if offset % 4 == 0 {
            moves.push(StockMove {
                item_id: "WHEEL-001".to_string(),
                category_id: Some("PARTS".to_string()),
                date,
                quantity: 8.0,
                source_internal: true,
                destination_internal: false,
            });
        }
    }

    let erp = DemoErp {
        moves,
        on_hand: HashMap::from([("BIKE-001", 20.0), ("WHEEL-001", 120.0)]),
    };

    let config = RunConfiguration::new(date_from, date_to)
        .with_source(DemandSource::StockMoves)
        .with_method(MethodKind::Wma)
        .with_horizon_days(14)
        .with_alert_channels(AlertChannels::new(true, false))
        .with_as_of(date_to);

    let mut run = ForecastRun::new(config).with_name("Demo Run".to_string());
    let ctx = RunContext::new(&erp, &erp, &erp, &erp);
    run.compute(&ctx)?;

    println!("\n{}", render_report(&run)?);

    if let Some(result) = run.result() {
        let table = ExportTable::from_results(result)?;
        println!("{}", String::from_utf8(table.to_csv())?);
    }

    Ok(())
}
