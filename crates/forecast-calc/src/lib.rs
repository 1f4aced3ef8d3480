//! # Forecast Calculation Engine
//!
//! 需求預測與缺貨預警計算引擎

pub mod alerting;
pub mod batch;
pub mod collaborators;
pub mod method;
pub mod ranking;
pub mod run;
pub mod series_builder;
pub mod shortage;

// Re-export 主要類型
pub use alerting::AlertEvaluator;
pub use batch::compute_batch;
pub use collaborators::{
    AlertSink, DispatchError, KeyCatalog, NoopAlertSink, RecordSource, RunContext, StockLedger,
};
pub use method::ForecastMethod;
pub use ranking::RankingSelector;
pub use run::{ForecastRun, RunState};
pub use series_builder::DemandSeriesBuilder;
pub use shortage::{Projection, ShortageProjector};
