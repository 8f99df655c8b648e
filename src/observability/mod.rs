pub mod metrics;
pub mod tracing;

use std::sync::Arc;

use anyhow::Result;
use prometheus::{Encoder, Registry, TextEncoder};

pub use self::metrics::Metrics;
pub use self::tracing::LogFormat;

/// Telemetry（メトリクスとトレーシング）を管理する構造体。
#[derive(Debug, Clone)]
pub struct Telemetry {
    registry: Arc<Registry>,
    metrics: Arc<Metrics>,
}

impl Telemetry {
    /// トレーシングを初期化し、専用レジストリにメトリクスを登録する。
    pub fn new(format: LogFormat) -> Result<Self> {
        tracing::init(format)?;
        Ok(Self::metrics_only()?)
    }

    /// サブスクライバに触れずにメトリクスだけを用意する（テスト・ベンチ用）。
    pub fn metrics_only() -> Result<Self, prometheus::Error> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(Metrics::new(Arc::clone(&registry))?);
        Ok(Self { registry, metrics })
    }

    /// メトリクスへのアクセスを提供する。
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn shared_metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Prometheusメトリクスをレンダリングする。
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_metrics() {
        let telemetry = Telemetry::metrics_only().expect("metrics register");
        telemetry.metrics().oracle_calls.inc();
        telemetry.metrics().last_solve_iterations.set(3.0);

        let rendered = telemetry.render_prometheus();
        assert!(rendered.contains("qubo_mst_oracle_calls_total 1"));
        assert!(rendered.contains("qubo_mst_last_solve_iterations 3"));
    }

    #[test]
    fn instances_do_not_share_registries() {
        let first = Telemetry::metrics_only().expect("metrics register");
        let second = Telemetry::metrics_only().expect("second registry is independent");
        first.metrics().solves_completed.inc();
        assert!(second
            .render_prometheus()
            .contains("qubo_mst_solves_completed_total 0"));
    }
}
