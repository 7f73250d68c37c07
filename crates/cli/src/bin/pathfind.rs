use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::error;
use trajet::{
    graph::StopGraph,
    pipeline::INVALID,
    router::Router,
    stops::{self, StopIndex},
};

/// Pathfinding on a stop graph.
#[derive(Parser)]
#[command(name = "pathfind")]
struct Args {
    /// Path to the graph artifact
    #[arg(long, default_value = "data/graph.json")]
    graph: PathBuf,

    /// Path to the stop-name index artifact
    #[arg(long, default_value = "data/stops_index.json")]
    stops_index: PathBuf,

    /// Path to the readable-name CSV
    #[arg(long, default_value = "data/stops_areas.csv")]
    stops_areas: PathBuf,

    /// Input file; stdin when absent
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print stop ids instead of readable names
    #[arg(long)]
    output_ids: bool,

    /// Treat input as raw id triplets, bypassing the name index
    #[arg(long)]
    ids: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.graph.exists() || !args.stops_index.exists() {
        error!("Graph or stop index artifact not found");
        return ExitCode::FAILURE;
    }
    let graph = match StopGraph::load(&args.graph) {
        Ok(graph) => graph,
        Err(err) => {
            error!("Failed to load graph: {err}");
            return ExitCode::FAILURE;
        }
    };
    let index = match StopIndex::load(&args.stops_index) {
        Ok(index) => index,
        Err(err) => {
            error!("Failed to load stop index: {err}");
            return ExitCode::FAILURE;
        }
    };
    let stop_names = match stops::load_stop_names(&args.stops_areas) {
        Ok(stop_names) => stop_names,
        Err(err) => {
            error!("Failed to load stop names: {err}");
            return ExitCode::FAILURE;
        }
    };
    let router = Router::new(&graph, &index);

    let inputs: Vec<String> = args
        .input
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    let run = trajet_cli::inputs::read_lines(&inputs, |line| {
        if line.is_empty() || !line.contains(',') {
            return;
        }
        let parts: Vec<&str> = line.splitn(3, ',').collect();
        let [id, origin, destination] = parts.as_slice() else {
            return;
        };
        let path = if args.ids {
            router.find_route_ids(origin, destination)
        } else {
            router.find_route(origin, destination)
        };
        let Some(path) = path else {
            println!("{id},{INVALID},");
            return;
        };
        let row: Vec<&str> = if args.output_ids {
            path.iter().map(String::as_str).collect()
        } else {
            path.iter()
                .map(|stop_id| {
                    stop_names
                        .get(stop_id)
                        .map(String::as_str)
                        .unwrap_or(stop_id)
                })
                .collect()
        };
        println!("{id},{}", row.join(","));
    });
    if let Err(err) = run {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
