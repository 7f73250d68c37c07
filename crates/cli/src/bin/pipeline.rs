use clap::Parser;
use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::error;
use trajet::{
    gazetteer::Gazetteer,
    graph::StopGraph,
    pipeline::{self, Counters, Pipeline},
    resolver::Resolver,
    stops::{self, StopIndex},
};

/// Run the NLP + pathfinding pipeline.
#[derive(Parser)]
#[command(name = "pipeline")]
struct Args {
    /// Input files, URLs, or "-" for stdin
    inputs: Vec<String>,

    #[arg(long, default_value = "data/places.txt")]
    places: PathBuf,

    #[arg(long, default_value = "data/graph.json")]
    graph: PathBuf,

    #[arg(long, default_value = "data/stops_index.json")]
    stops_index: PathBuf,

    #[arg(long, default_value = "data/stops_areas.csv")]
    stops_areas: PathBuf,

    #[arg(long, default_value = "reports/pipeline_nlp_output.csv")]
    output_nlp: PathBuf,

    #[arg(long, default_value = "reports/pipeline_path_output.csv")]
    output_path: PathBuf,

    /// Emit stop ids on the path output instead of readable names
    #[arg(long)]
    output_ids: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    for required in [&args.places, &args.graph, &args.stops_index] {
        if !required.exists() {
            error!("Required file not found: {}", required.display());
            return ExitCode::FAILURE;
        }
    }
    let pipeline = match build_pipeline(&args) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let (mut nlp_out, mut path_out) = match (open_output(&args.output_nlp), open_output(&args.output_path))
    {
        (Ok(nlp_out), Ok(path_out)) => (nlp_out, path_out),
        (Err(err), _) | (_, Err(err)) => {
            error!("Failed to open output: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut counters = Counters::default();
    let mut write_failure = None;
    let run = trajet_cli::inputs::read_lines(&args.inputs, |line| {
        let Some((id, sentence)) = pipeline::parse_sentence_line(line) else {
            return;
        };
        let processed = pipeline.process(id, sentence);
        counters.record(processed.status);
        if let Err(err) = writeln!(nlp_out, "{}", processed.nlp_row.join(","))
            .and_then(|()| writeln!(path_out, "{}", processed.path_row.join(",")))
        {
            write_failure.get_or_insert(err);
        }
    });
    if let Err(err) = run {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = nlp_out.flush().and_then(|()| path_out.flush()) {
        write_failure.get_or_insert(err);
    }
    if let Some(err) = write_failure {
        error!("Failed to write output: {err}");
        return ExitCode::FAILURE;
    }

    println!("total={}", counters.total);
    println!("ok={}", counters.ok);
    println!("nlp_invalid={}", counters.nlp_invalid);
    println!("path_invalid={}", counters.path_invalid);
    println!("output_nlp={}", args.output_nlp.display());
    println!("output_path={}", args.output_path.display());
    ExitCode::SUCCESS
}

fn build_pipeline(args: &Args) -> Result<Pipeline, String> {
    let gazetteer =
        Gazetteer::load(&args.places).map_err(|err| format!("Failed to load places: {err}"))?;
    let resolver =
        Resolver::new(gazetteer).map_err(|err| format!("Failed to build resolver: {err}"))?;
    let graph =
        StopGraph::load(&args.graph).map_err(|err| format!("Failed to load graph: {err}"))?;
    let index = StopIndex::load(&args.stops_index)
        .map_err(|err| format!("Failed to load stop index: {err}"))?;
    let stop_names = stops::load_stop_names(&args.stops_areas)
        .map_err(|err| format!("Failed to load stop names: {err}"))?;
    Ok(Pipeline::new(resolver, graph, index, stop_names).with_output_ids(args.output_ids))
}

fn open_output(path: &PathBuf) -> std::io::Result<BufWriter<fs::File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(fs::File::create(path)?))
}
