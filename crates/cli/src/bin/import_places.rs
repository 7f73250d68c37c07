use clap::Parser;
use std::{
    collections::HashSet,
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};
use trajet::schedule::Table;

/// Column names probed for station labels, in preference order.
const DEFAULT_COLUMNS: [&str; 7] = [
    "name",
    "nom",
    "libelle",
    "label",
    "station_name",
    "stop_name",
    "gare",
];

/// Import place names from a stations table into a gazetteer file.
#[derive(Parser)]
#[command(name = "import-places")]
struct Args {
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "data/places_imported.txt")]
    output: PathBuf,

    /// Name column to read; auto-detected when absent
    #[arg(long)]
    column: Option<String>,

    /// Also emit "Gare de X|X" and "Gare X|X" alias lines
    #[arg(long)]
    add_gare_alias: bool,

    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    if !args.input.exists() {
        error!("Input file not found: {}", args.input.display());
        return ExitCode::FAILURE;
    }
    let mut table = match Table::open(&args.input) {
        Ok(table) => table,
        Err(err) => {
            error!("Failed to open input: {err}");
            return ExitCode::FAILURE;
        }
    };
    let Some(column) = select_column(&table, args.column.as_deref()) else {
        error!("No name column found");
        return ExitCode::FAILURE;
    };

    let mut names: Vec<String> = Vec::new();
    for result in table.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                error!("Failed to read input: {err}");
                return ExitCode::FAILURE;
            }
        };
        let value = record.get(column).unwrap_or("").trim();
        if !value.is_empty() {
            names.push(value.to_string());
        }
    }
    if names.is_empty() {
        error!("No place names found");
        return ExitCode::FAILURE;
    }
    if let Some(limit) = args.limit {
        names.truncate(limit);
    }

    let mut unique: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for name in names {
        if seen.insert(name.clone()) {
            unique.push(name);
        }
    }

    if let Err(err) = write_places(&args, &unique) {
        error!("Failed to write places: {err}");
        return ExitCode::FAILURE;
    }
    info!("Wrote {} places to {}", unique.len(), args.output.display());
    ExitCode::SUCCESS
}

fn select_column<R: std::io::Read>(table: &Table<R>, preferred: Option<&str>) -> Option<usize> {
    let find = |wanted: &str| {
        table
            .headers()
            .find(|name| name.to_lowercase() == wanted)
            .and_then(|name| table.column(name))
    };
    match preferred {
        Some(preferred) => find(&preferred.to_lowercase()),
        None => DEFAULT_COLUMNS.iter().find_map(|candidate| find(candidate)),
    }
}

fn write_places(args: &Args, names: &[String]) -> std::io::Result<()> {
    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(fs::File::create(&args.output)?);
    for name in names {
        writeln!(out, "{name}")?;
        if args.add_gare_alias {
            writeln!(out, "Gare de {name}|{name}")?;
            writeln!(out, "Gare {name}|{name}")?;
        }
    }
    out.flush()
}
