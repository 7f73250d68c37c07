use clap::Parser;
use std::{fs, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use trajet::{
    schedule::Table,
    shared::text::normalize,
    stops::{self, StopIndex},
};

/// Build the stop area index from a stops table.
#[derive(Parser)]
#[command(name = "build-stop-index")]
struct Args {
    /// Stops table (`stop_id`, `stop_name`, optional `location_type`)
    #[arg(long, default_value = "stops.txt")]
    input: PathBuf,

    /// Readable-name CSV output
    #[arg(long, default_value = "data/stops_areas.csv")]
    output_csv: PathBuf,

    /// Stop index JSON output
    #[arg(long, default_value = "data/stops_index.json")]
    output_json: PathBuf,

    /// Bound the number of areas kept
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.input.exists() {
        error!("Stops file not found: {}", args.input.display());
        return ExitCode::FAILURE;
    }
    let mut table = match Table::open(&args.input) {
        Ok(table) => table,
        Err(err) => {
            error!("Failed to open stops table: {err}");
            return ExitCode::FAILURE;
        }
    };
    let areas = match stops::read_areas(&mut table, args.limit) {
        Ok(areas) => areas,
        Err(err) => {
            error!("Failed to read stops table: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = write_areas_csv(&args.output_csv, &areas) {
        error!("Failed to write areas CSV: {err}");
        return ExitCode::FAILURE;
    }
    let index = StopIndex::from_areas(&areas);
    if let Err(err) = index.save(&args.output_json) {
        error!("Failed to write stop index: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "Indexed {} areas under {} names",
        areas.len(),
        index.len()
    );
    ExitCode::SUCCESS
}

fn write_areas_csv(path: &PathBuf, areas: &[(String, String)]) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(csv::Error::from)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["stop_id", "stop_name", "normalized"])?;
    for (stop_id, stop_name) in areas {
        let normalized = normalize(stop_name);
        writer.write_record([stop_id.as_str(), stop_name.as_str(), normalized.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
