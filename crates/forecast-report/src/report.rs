//! 文字報表

use std::fmt::{self, Write};

use forecast_calc::{ForecastMethod, ForecastRun};
use forecast_core::{ForecastError, RunResult};

use crate::export::{round, ExportTable, EXPORT_HEADERS};

/// 產生預測報表
///
/// 只讀取執行的最近一次結果；尚未計算或沒有結果時返回 `EmptyResultSet`。
pub fn render_report(run: &ForecastRun) -> forecast_core::Result<String> {
    let run_result = run.result().ok_or(ForecastError::EmptyResultSet)?;
    let table = ExportTable::from_results(run_result)?;

    let mut doc = String::new();
    write_report(&mut doc, run, run_result, &table)
        .map_err(|e| ForecastError::Export(format!("報表輸出失敗: {}", e)))?;

    Ok(doc)
}

fn write_report(
    doc: &mut String,
    run: &ForecastRun,
    run_result: &RunResult,
    table: &ExportTable,
) -> fmt::Result {
    let config = run.config();
    let kpis = &run_result.kpis;

    let rows: Vec<[String; 9]> = table.rows().iter().map(|r| r.cells()).collect();
    let mut widths = EXPORT_HEADERS.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(doc, "Predictive Report")?;
    writeln!(doc, "Run: {}", run.name())?;
    writeln!(
        doc,
        "Window: {} ~ {} ({} days)",
        config.date_from,
        config.date_to,
        run_result.results[0].window_days
    )?;
    writeln!(
        doc,
        "Method: {} | Horizon: {} days | Warn: <= {} days",
        method_label(ForecastMethod::from_config(config)),
        config.horizon_days,
        config.warn_threshold_days
    )?;
    writeln!(
        doc,
        "Items: {} | Total Forecast: {} | Total On Hand: {} | At Risk: {}",
        kpis.total_items,
        round(kpis.total_forecast_quantity, 2),
        round(kpis.total_on_hand, 2),
        kpis.at_risk_count
    )?;
    writeln!(doc)?;

    write_line(doc, &EXPORT_HEADERS.map(str::to_string), &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(doc, "{}", rule.join("-+-"))?;
    for cells in &rows {
        write_line(doc, cells, &widths)?;
    }

    Ok(())
}

fn write_line(doc: &mut String, cells: &[String; 9], widths: &[usize; 9]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(doc, "{}", padded.join(" | ").trim_end())
}

fn method_label(method: ForecastMethod) -> String {
    match method {
        ForecastMethod::Sma => "SMA".to_string(),
        ForecastMethod::Wma { window } => format!("WMA (window {})", window),
        ForecastMethod::Ets { alpha } => format!("ETS (alpha {})", alpha),
    }
}
