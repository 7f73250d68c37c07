use clap::Parser;
use std::{fs, io, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use trajet::schedule;

const DEFAULT_URL: &str =
    "https://eu.ftp.opendatasoft.com/sncf/plandata/export-opendata-sncf-gtfs.zip";

/// Download and extract a GTFS schedule archive.
#[derive(Parser)]
#[command(name = "fetch-gtfs")]
struct Args {
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    #[arg(long, default_value = "data/gtfs/gtfs.zip")]
    zip: PathBuf,

    #[arg(long, default_value = "data/gtfs")]
    output_dir: PathBuf,

    /// Extract the archive after downloading
    #[arg(long)]
    extract: bool,

    /// Archive members to extract, by base name
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "stop_times.txt,stops.txt,trips.txt,routes.txt"
    )]
    only: Vec<String>,

    #[arg(long)]
    skip_download: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.skip_download {
        info!("Downloading {}...", args.url);
        if let Err(err) = download(&args.url, &args.zip) {
            error!("Download failed: {err}");
            return ExitCode::FAILURE;
        }
        info!("Saved to {}", args.zip.display());
    }

    if args.extract {
        info!("Extracting to {}...", args.output_dir.display());
        match schedule::extract_archive(&args.zip, &args.output_dir, &args.only) {
            Ok(written) => info!("Extracted {} files", written.len()),
            Err(err) => {
                error!("Extraction failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn download(url: &str, destination: &PathBuf) -> Result<(), String> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let mut response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|err| err.to_string())?;
    let mut out = fs::File::create(destination).map_err(|err| err.to_string())?;
    io::copy(&mut response, &mut out).map_err(|err| err.to_string())?;
    Ok(())
}
