use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::error;
use trajet::{gazetteer::Gazetteer, pipeline::INVALID, resolver::Resolver};

/// Extract origin and destination from travel orders.
#[derive(Parser)]
#[command(name = "resolver")]
struct Args {
    /// Input files, URLs, or "-" for stdin
    inputs: Vec<String>,

    /// Path to the places list
    #[arg(long, default_value = "data/places.txt")]
    places: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.places.exists() {
        error!("Places file not found: {}", args.places.display());
        return ExitCode::FAILURE;
    }
    let gazetteer = match Gazetteer::load(&args.places) {
        Ok(gazetteer) => gazetteer,
        Err(err) => {
            error!("Failed to load places: {err}");
            return ExitCode::FAILURE;
        }
    };
    let resolver = match Resolver::new(gazetteer) {
        Ok(resolver) => resolver,
        Err(err) => {
            error!("Failed to build resolver: {err}");
            return ExitCode::FAILURE;
        }
    };

    let run = trajet_cli::inputs::read_lines(&args.inputs, |line| {
        if line.trim().is_empty() {
            return;
        }
        let Some((id, sentence)) = line.split_once(',') else {
            return;
        };
        match resolver.resolve(sentence) {
            Some((origin, destination)) => println!("{id},{origin},{destination}"),
            None => println!("{id},{INVALID},"),
        }
    });
    if let Err(err) = run {
        error!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
