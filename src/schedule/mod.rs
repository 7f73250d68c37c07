mod table;

pub use table::*;

use std::{
    fs,
    io::{self},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Extracts schedule files from an archive, flattened into `output_dir`.
/// When `only` is non-empty, only members whose base name is listed are
/// written. Returns the written paths.
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    zip_path: P,
    output_dir: Q,
    only: &[String],
) -> Result<Vec<PathBuf>, Error> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let file = fs::File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut written = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let base = name.rsplit('/').next().unwrap_or(name.as_str());
        if !only.is_empty() && !only.iter().any(|wanted| wanted == base) {
            continue;
        }
        let target = output_dir.join(base);
        let mut out = fs::File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        info!("Extracted {} to {:?}", name, target);
        written.push(target);
    }
    Ok(written)
}
