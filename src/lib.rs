//! # Forecast
//!
//! 需求預測與缺貨預警：核心模型、計算引擎與匯出報表

pub use forecast_calc;
pub use forecast_core;
pub use forecast_report;

pub use forecast_calc::{
    compute_batch, AlertSink, DispatchError, ForecastMethod, ForecastRun, KeyCatalog,
    RecordSource, RunContext, RunState, StockLedger,
};
pub use forecast_core::{
    ForecastError, ForecastResult, GroupMode, MethodKind, RunConfiguration, RunResult, Result,
};
pub use forecast_report::{render_report, ExportTable};
