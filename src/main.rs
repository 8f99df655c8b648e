use anyhow::Context;
use tracing::{error, info};

use qubo_mst::{
    MstPipeline, WeightedGraph,
    config::{Config, ConfigError},
    graph::{GraphDocument, demo_graph, generate_edges},
    observability::Telemetry,
    oracle::build_oracle,
};

const RANDOM_WEIGHT_MIN: u32 = 1;
const RANDOM_WEIGHT_MAX: u32 = 10;

fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                message,
                "panic occurred"
            );
        } else {
            error!(message, "panic occurred without location information");
        }
    }));

    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        // --help / --version and usage errors print and exit the clap way
        Err(ConfigError::Cli(cli)) => cli.exit(),
        Err(other) => return Err(other).context("failed to load configuration"),
    };

    let telemetry = Telemetry::new(config.log_format).context("failed to initialize telemetry")?;
    info!(
        version = qubo_mst::VERSION,
        oracle = ?config.oracle,
        strategy = ?config.strategy,
        "qubo-mst starting"
    );

    let graph = load_graph(&config)?;
    let oracle = build_oracle(&config.oracle_settings());
    let mut pipeline = MstPipeline::new(oracle, config.solver_config(), config.strategy)
        .with_metrics(telemetry.shared_metrics());

    let result = pipeline.run(&graph);
    if config.print_metrics {
        eprintln!("{}", telemetry.render_prometheus());
    }
    let report = result.context("minimum spanning tree pipeline failed")?;

    info!(
        iterations = report.iterations,
        total_weight = report.total_weight,
        prototypes = report.prototypes.len(),
        "pipeline completed"
    );
    let rendered =
        serde_json::to_string_pretty(&report).context("failed to serialize pipeline report")?;
    println!("{rendered}");
    Ok(())
}

fn load_graph(config: &Config) -> anyhow::Result<WeightedGraph> {
    if let Some(path) = &config.graph {
        return GraphDocument::load(path)?.into_graph();
    }
    if let Some(nodes) = config.random_nodes {
        let edges = generate_edges(nodes, RANDOM_WEIGHT_MIN, RANDOM_WEIGHT_MAX, config.seed);
        info!(nodes, edges = edges.len(), seed = config.seed, "random graph generated");
        return WeightedGraph::new(nodes, edges).context("generated graph is invalid");
    }
    info!("no graph given; using the built-in demo graph");
    demo_graph().into_graph()
}
