use crate::schedule::Error;
use std::{
    collections::HashMap,
    fs,
    io::{self, Read},
    path::Path,
};

const SNIFF_BYTES: usize = 2048;

/// A header-addressed view over a delimiter-sniffed tabular file. Columns
/// are looked up by name so optional columns degrade gracefully.
pub struct Table<R: Read> {
    reader: csv::Reader<R>,
    columns: HashMap<String, usize>,
}

impl Table<io::BufReader<fs::File>> {
    /// Opens a schedule table, sniffing the delimiter among `;`, `,`, tab.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let delimiter = sniff_delimiter(&path)?;
        let file = fs::File::open(&path)?;
        // BufReader is critical here for speed
        let reader = io::BufReader::with_capacity(128 * 1024, file);
        Self::from_reader(reader, delimiter)
    }
}

impl<R: Read> Table<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let columns = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();
        Ok(Self { reader, columns })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, Error> {
        self.column(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn records(&mut self) -> csv::StringRecordsIter<'_, R> {
        self.reader.records()
    }
}

/// Picks the delimiter whose count in the leading sample is highest,
/// preferring `;` over `,` over tab on ties and defaulting to `,`.
pub fn sniff_delimiter<P: AsRef<Path>>(path: P) -> Result<u8, Error> {
    let file = fs::File::open(path)?;
    let mut sample = Vec::with_capacity(SNIFF_BYTES);
    file.take(SNIFF_BYTES as u64).read_to_end(&mut sample)?;
    Ok(sniff_sample(&sample))
}

pub fn sniff_sample(sample: &[u8]) -> u8 {
    let mut delimiter = b',';
    let mut best = 0usize;
    for candidate in [b';', b',', b'\t'] {
        let count = sample.iter().filter(|byte| **byte == candidate).count();
        if count > best {
            best = count;
            delimiter = candidate;
        }
    }
    delimiter
}
