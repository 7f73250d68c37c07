use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use trajet::graph::GraphBuilder;

/// Build a stop graph from schedule stop times.
#[derive(Parser)]
#[command(name = "build-graph")]
struct Args {
    /// Trip-stops table (`trip_id`, `stop_id`, optional `stop_sequence`)
    #[arg(long)]
    stop_times: PathBuf,

    #[arg(long, default_value = "data/graph.json")]
    output: PathBuf,

    /// Stops table used to collapse child stops to their parent station
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Bound the number of distinct trips read
    #[arg(long)]
    limit_trips: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.stop_times.exists() {
        error!("Stop times file not found: {}", args.stop_times.display());
        return ExitCode::FAILURE;
    }

    let mut builder = GraphBuilder::new();
    if let Some(stops) = &args.stops {
        match GraphBuilder::load_parent_map(stops) {
            Ok(parent_map) => builder = builder.with_parent_map(parent_map),
            Err(err) => {
                error!("Failed to load stops table: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    if let Some(limit) = args.limit_trips {
        builder = builder.with_limit_trips(limit);
    }

    let graph = match builder.build_from_path(&args.stop_times) {
        Ok(graph) => graph,
        Err(err) => {
            error!("Failed to build graph: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = graph.save(&args.output) {
        error!("Failed to write graph: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "Wrote {} nodes and {} adjacency entries to {}",
        graph.meta.node_count,
        graph.meta.edge_count,
        args.output.display()
    );
    ExitCode::SUCCESS
}
