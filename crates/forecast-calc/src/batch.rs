//! 多組配置的並行計算

use rayon::prelude::*;

use forecast_core::RunResult;

use crate::collaborators::RunContext;
use crate::run::ForecastRun;

/// 並行計算多個彼此獨立的預測執行
///
/// 各執行不共享狀態，結果順序與輸入相同。
pub fn compute_batch(
    runs: &mut [ForecastRun],
    ctx: &RunContext<'_>,
) -> Vec<forecast_core::Result<RunResult>> {
    tracing::info!("批次預測計算: {} 組配置", runs.len());

    runs.par_iter_mut()
        .map(|run| run.compute(ctx).cloned())
        .collect()
}
