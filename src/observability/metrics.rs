/// Prometheusメトリクス定義。
use prometheus::{
    Counter, Gauge, Histogram, HistogramOpts, Registry, register_counter_with_registry,
    register_gauge_with_registry, register_histogram_with_registry,
};
use std::sync::Arc;

/// オラクル呼び出し時間のバケット（秒）。
const ORACLE_DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0];

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub solver_iterations: Counter,
    pub cycle_constraints: Counter,
    pub oracle_calls: Counter,
    pub oracle_failures: Counter,
    pub solves_completed: Counter,
    pub solves_failed: Counter,

    // ヒストグラム
    pub oracle_duration: Histogram,

    // ゲージ
    pub last_solve_iterations: Gauge,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成する。
    pub fn new(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            solver_iterations: register_counter_with_registry!(
                "qubo_mst_solver_iterations_total",
                "Total number of cycle-elimination iterations",
                registry
            )?,
            cycle_constraints: register_counter_with_registry!(
                "qubo_mst_cycle_constraints_total",
                "Total number of cycle constraints added to models",
                registry
            )?,
            oracle_calls: register_counter_with_registry!(
                "qubo_mst_oracle_calls_total",
                "Total number of oracle invocations",
                registry
            )?,
            oracle_failures: register_counter_with_registry!(
                "qubo_mst_oracle_failures_total",
                "Total number of failed oracle invocations",
                registry
            )?,
            solves_completed: register_counter_with_registry!(
                "qubo_mst_solves_completed_total",
                "Total number of solves that produced a spanning tree",
                registry
            )?,
            solves_failed: register_counter_with_registry!(
                "qubo_mst_solves_failed_total",
                "Total number of solves that ended in an error",
                registry
            )?,
            oracle_duration: register_histogram_with_registry!(
                HistogramOpts::new(
                    "qubo_mst_oracle_duration_seconds",
                    "Duration of oracle invocations",
                )
                .buckets(ORACLE_DURATION_BUCKETS.to_vec()),
                registry
            )?,
            last_solve_iterations: register_gauge_with_registry!(
                "qubo_mst_last_solve_iterations",
                "Iterations used by the most recent solve",
                registry
            )?,
        })
    }
}
