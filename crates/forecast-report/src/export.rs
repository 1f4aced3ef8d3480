//! 表格匯出

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use forecast_core::{ForecastError, ForecastResult, RunResult};

/// 匯出欄位（順序即外部契約）
pub const EXPORT_HEADERS: [&str; 9] = [
    "Key",
    "UoM",
    "Qty in Window",
    "Window Days",
    "Daily Rate",
    "Forecast",
    "On Hand",
    "Days till Shortage",
    "Shortage Date",
];

/// 匯出的一列（已四捨五入）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub key: String,
    pub uom: String,
    pub qty_in_window: Decimal,
    pub window_days: usize,
    pub daily_rate: Decimal,
    pub forecast: Decimal,
    pub on_hand: Decimal,
    pub days_till_shortage: Decimal,
    pub shortage_date: String,
}

impl ExportRow {
    pub fn from_result(result: &ForecastResult) -> Self {
        Self {
            key: result.display_name.clone(),
            uom: result.unit_of_measure.clone().unwrap_or_default(),
            qty_in_window: round(result.quantity_in_window, 2),
            window_days: result.window_days,
            daily_rate: round(result.daily_rate, 4),
            forecast: round(result.forecast_quantity, 2),
            on_hand: round(result.stock_on_hand, 2),
            days_till_shortage: round(result.days_until_shortage, 2),
            shortage_date: result
                .shortage_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }

    /// 依欄位順序輸出文字
    pub fn cells(&self) -> [String; 9] {
        [
            self.key.clone(),
            self.uom.clone(),
            self.qty_in_window.to_string(),
            self.window_days.to_string(),
            self.daily_rate.to_string(),
            self.forecast.to_string(),
            self.on_hand.to_string(),
            self.days_till_shortage.to_string(),
            self.shortage_date.clone(),
        ]
    }
}

/// 四捨五入到固定小數位數；無法表示的數值（NaN、無窮大）記為 0
pub(crate) fn round(value: f64, dp: u32) -> Decimal {
    let mut d = Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(dp);
    d
}

/// 預測結果表
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    rows: Vec<ExportRow>,
}

impl ExportTable {
    /// 從執行結果建立，沒有結果時失敗
    pub fn from_results(run_result: &RunResult) -> forecast_core::Result<Self> {
        if run_result.is_empty() {
            return Err(ForecastError::EmptyResultSet);
        }

        Ok(Self {
            rows: run_result.results.iter().map(ExportRow::from_result).collect(),
        })
    }

    pub fn headers(&self) -> &'static [&'static str; 9] {
        &EXPORT_HEADERS
    }

    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    /// 輸出 CSV
    pub fn to_csv(&self) -> Vec<u8> {
        let mut out = String::new();
        push_csv_line(&mut out, EXPORT_HEADERS.iter().copied());
        for row in &self.rows {
            let cells = row.cells();
            push_csv_line(&mut out, cells.iter().map(String::as_str));
        }
        out.into_bytes()
    }

    /// 輸出 JSON 陣列
    pub fn to_json(&self) -> forecast_core::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.rows).map_err(|e| ForecastError::Export(e.to_string()))
    }
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::RunKpis;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(name: &str, uom: Option<&str>) -> ForecastResult {
        ForecastResult {
            key: "K".to_string(),
            display_name: name.to_string(),
            unit_of_measure: uom.map(str::to_string),
            quantity_in_window: 6.0,
            window_days: 3,
            daily_rate: 2.0 / 3.0,
            forecast_quantity: 20.0,
            stock_on_hand: 18.0,
            days_until_shortage: 27.0,
            shortage_date: NaiveDate::from_ymd_opt(2025, 11, 28),
        }
    }

    fn run_result(results: Vec<ForecastResult>) -> RunResult {
        let kpis = RunKpis::aggregate(&results, 7);
        RunResult {
            run_id: Uuid::new_v4(),
            results,
            kpis,
            alerts_dispatched: 0,
            alerts_failed: 0,
        }
    }

    #[rstest]
    #[case(2.0, 2, "2.00")]
    #[case(2.0 / 3.0, 4, "0.6667")]
    #[case(0.125, 2, "0.13")]
    #[case(-1.5, 0, "-2")]
    #[case(f64::NAN, 2, "0.00")]
    fn test_round(#[case] value: f64, #[case] dp: u32, #[case] expected: &str) {
        assert_eq!(round(value, dp).to_string(), expected);
    }

    #[test]
    fn test_empty_result_set() {
        let err = ExportTable::from_results(&run_result(vec![])).unwrap_err();
        assert!(matches!(err, ForecastError::EmptyResultSet));
    }

    #[test]
    fn test_csv_layout() {
        let table = ExportTable::from_results(&run_result(vec![row("Road Bike", Some("Units"))]))
            .unwrap();
        let csv = String::from_utf8(table.to_csv()).unwrap();
        let lines: Vec<_> = csv.split("\r\n").collect();

        assert_eq!(
            lines[0],
            "Key,UoM,Qty in Window,Window Days,Daily Rate,Forecast,On Hand,Days till Shortage,Shortage Date"
        );
        assert_eq!(
            lines[1],
            "Road Bike,Units,6.00,3,0.6667,20.00,18.00,27.00,2025-11-28"
        );
    }

    #[test]
    fn test_csv_quoting_and_missing_values() {
        let mut result = row("Bolt, \"M8\"", None);
        result.shortage_date = None;
        let table = ExportTable::from_results(&run_result(vec![result])).unwrap();
        let csv = String::from_utf8(table.to_csv()).unwrap();

        assert!(csv.contains("\"Bolt, \"\"M8\"\"\",,6.00,"));
        assert!(csv.ends_with(",27.00,\r\n"));
    }

    #[test]
    fn test_json_rows() {
        let table = ExportTable::from_results(&run_result(vec![row("Road Bike", None)])).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&table.to_json().unwrap()).unwrap();

        assert_eq!(json[0]["key"], "Road Bike");
        assert_eq!(json[0]["window_days"], 3);
        assert_eq!(json[0]["forecast"], "20.00");
    }
}
