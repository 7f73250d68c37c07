mod index;

pub use index::PlaceIndex;

use crate::shared::text::normalize;
use indexmap::IndexMap;
use regex::Regex;
use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    path::Path,
    time::Instant,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Gazetteer has no usable entries")]
    Empty,
}

/// The alias/canonical mapping loaded at startup, together with the exact
/// match pattern and the fuzzy lookup index derived from it. Immutable after
/// construction; shared by reference across many sentences.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    mapping: IndexMap<String, String>,
    pattern: Regex,
    index: PlaceIndex,
}

impl Gazetteer {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses gazetteer lines: either `canonical` or `alias|canonical`,
    /// with `#` comments and blank lines ignored. When two aliases share a
    /// normalized form the later entry overwrites the earlier one.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let now = Instant::now();
        let mut mapping: IndexMap<String, String> = IndexMap::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let (alias, canonical) = match entry.split_once('|') {
                Some((alias, canonical)) => (alias.trim(), canonical.trim()),
                None => (entry, entry),
            };
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }
            mapping.insert(normalize(alias), canonical.to_string());
        }
        if mapping.is_empty() {
            return Err(Error::Empty);
        }

        let pattern = build_pattern(mapping.keys())?;
        let index = PlaceIndex::build(&mapping);
        debug!(
            "Loading {} gazetteer entries took {:?}",
            mapping.len(),
            now.elapsed()
        );
        Ok(Self {
            mapping,
            pattern,
            index,
        })
    }

    /// Canonical name for a normalized variant, if any.
    pub fn canonical(&self, variant: &str) -> Option<&str> {
        self.mapping.get(variant).map(String::as_str)
    }

    /// The exact place pattern: the union of all aliases, longest first,
    /// anchored on word boundaries.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn index(&self) -> &PlaceIndex {
        &self.index
    }

    pub fn max_tokens(&self) -> usize {
        self.index.max_tokens()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

/// Builds the alias union pattern. Variants are sorted by descending length
/// so the longest alias wins; normalized aliases contain only `[a-z0-9 ]`,
/// so spaces are the only characters needing a rewrite (any run of
/// whitespace matches one alias space).
fn build_pattern<'a, I>(variants: I) -> Result<Regex, regex::Error>
where
    I: Iterator<Item = &'a String>,
{
    let mut ordered: Vec<&String> = variants.collect();
    ordered.sort_by_key(|variant| std::cmp::Reverse(variant.chars().count()));
    let parts: Vec<String> = ordered
        .iter()
        .map(|variant| variant.replace(' ', r"\s+"))
        .collect();
    Regex::new(&format!(r"\b(?:{})\b", parts.join("|")))
}
