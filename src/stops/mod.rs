use crate::schedule::{self, Table};
use crate::shared::{fuzzy, text::normalize};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    io::{self, BufReader, BufWriter, Read},
    path::Path,
    time::Instant,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schedule error: {0}")]
    Schedule(#[from] schedule::Error),
}

/// Tokens too short or too generic to anchor a fuzzy stop-name match.
const GENERIC_TOKENS: [&str; 5] = ["gare", "station", "halte", "arret", "stop"];

/// One indexed station name: the readable spellings that normalize to the
/// key, and the stop ids they designate.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StopEntry {
    pub names: Vec<String>,
    pub stop_ids: Vec<String>,
}

/// Maps normalized station names to stop ids, with exact, prefix, fuzzy
/// prefix and substring resolution. Built once from schedule data and
/// reused across queries.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopIndex {
    entries: BTreeMap<String, StopEntry>,
}

impl StopIndex {
    /// Builds the index from `(stop_id, stop_name)` pairs. Names and ids are
    /// kept sorted and deduplicated per normalized key.
    pub fn from_areas(areas: &[(String, String)]) -> Self {
        let now = Instant::now();
        let mut names: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut stop_ids: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (stop_id, stop_name) in areas {
            let key = normalize(stop_name);
            if key.is_empty() {
                continue;
            }
            names.entry(key.clone()).or_default().insert(stop_name.clone());
            stop_ids.entry(key).or_default().insert(stop_id.clone());
        }
        let entries: BTreeMap<String, StopEntry> = names
            .into_iter()
            .zip(stop_ids.into_values())
            .map(|((key, names), stop_ids)| {
                (
                    key,
                    StopEntry {
                        names: names.into_iter().collect(),
                        stop_ids: stop_ids.into_iter().collect(),
                    },
                )
            })
            .collect();
        debug!(
            "Indexing {} stop names took {:?}",
            entries.len(),
            now.elapsed()
        );
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&StopEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Resolves a station name to stop ids. Rungs are tried in order and the
    /// first non-empty result wins: exact key (with saint/st query
    /// variants), prefix, fuzzy prefix, substring. The result is sorted and
    /// deduplicated.
    pub fn resolve_stop_ids(&self, name: &str) -> Vec<String> {
        let key = normalize(name);
        if key.is_empty() {
            return Vec::new();
        }
        let queries = query_keys(&key);

        let mut found: BTreeSet<String> = BTreeSet::new();
        for query in &queries {
            if let Some(entry) = self.entries.get(query) {
                found.extend(entry.stop_ids.iter().cloned());
            }
        }
        if !found.is_empty() {
            return found.into_iter().collect();
        }

        for query in &queries {
            let prefix = format!("{query} ");
            for (candidate, entry) in &self.entries {
                if candidate.starts_with(&prefix) {
                    found.extend(entry.stop_ids.iter().cloned());
                }
            }
        }
        if !found.is_empty() {
            return found.into_iter().collect();
        }

        let found = self.resolve_fuzzy_prefix(&queries);
        if !found.is_empty() {
            return found.into_iter().collect();
        }

        let mut found: BTreeSet<String> = BTreeSet::new();
        for query in &queries {
            for (candidate, entry) in &self.entries {
                if candidate.contains(query.as_str()) {
                    found.extend(entry.stop_ids.iter().cloned());
                }
            }
        }
        found.into_iter().collect()
    }

    /// Compares each query against the space-joined first n tokens of every
    /// index key with at least n tokens; keeps the minimum distance within
    /// tolerance and unions the ids of every key achieving it. Requires at
    /// least one informative query token so bare generics like "gare" do
    /// not sweep the whole index.
    fn resolve_fuzzy_prefix(&self, queries: &[String]) -> BTreeSet<String> {
        let mut best: Option<usize> = None;
        let mut matched: BTreeSet<String> = BTreeSet::new();
        for query in queries {
            if !has_informative_token(query) {
                continue;
            }
            let width = query.split(' ').count();
            let tolerance = fuzzy::max_distance(query);
            let scored: Vec<(usize, &StopEntry)> = self
                .entries
                .par_iter()
                .filter_map(|(candidate, entry)| {
                    let tokens: Vec<&str> = candidate.split(' ').collect();
                    if tokens.len() < width {
                        return None;
                    }
                    let head = tokens[..width].join(" ");
                    let dist = fuzzy::distance(query, &head);
                    (dist <= tolerance).then_some((dist, entry))
                })
                .collect();
            for (dist, entry) in scored {
                match best {
                    Some(b) if dist > b => {}
                    Some(b) if dist == b => {
                        matched.extend(entry.stop_ids.iter().cloned());
                    }
                    _ => {
                        best = Some(dist);
                        matched = entry.stop_ids.iter().cloned().collect();
                    }
                }
            }
        }
        matched
    }
}

/// Reads `(stop_id, stop_name)` pairs for stop areas out of a stops table.
/// Rows typed as anything other than a station area are skipped; untyped
/// rows are kept.
pub fn read_areas<R: Read>(
    table: &mut Table<R>,
    limit: Option<usize>,
) -> Result<Vec<(String, String)>, Error> {
    let stop_col = table.require("stop_id").map_err(Error::Schedule)?;
    let name_col = table.require("stop_name").map_err(Error::Schedule)?;
    let location_col = table.column("location_type");

    let mut areas = Vec::new();
    for result in table.records() {
        let record = result.map_err(schedule::Error::from)?;
        if limit.is_some_and(|limit| areas.len() >= limit) {
            break;
        }
        if let Some(location) = location_col.and_then(|idx| record.get(idx)) {
            let location = location.trim();
            if !location.is_empty() && location != "1" {
                continue;
            }
        }
        let stop_id = record.get(stop_col).unwrap_or("").trim();
        let stop_name = record.get(name_col).unwrap_or("").trim();
        if stop_id.is_empty() || stop_name.is_empty() {
            continue;
        }
        areas.push((stop_id.to_string(), stop_name.to_string()));
    }
    Ok(areas)
}

/// Loads the readable-name map (`stop_id,stop_name`) written next to the
/// stop index. A missing file yields an empty map; the first spelling of a
/// stop id wins.
pub fn load_stop_names<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, Error> {
    if !path.as_ref().exists() {
        return Ok(HashMap::new());
    }
    let file = fs::File::open(path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers = reader.headers().map_err(schedule::Error::from)?;
    let stop_col = headers.iter().position(|name| name.trim() == "stop_id");
    let name_col = headers.iter().position(|name| name.trim() == "stop_name");
    let (Some(stop_col), Some(name_col)) = (stop_col, name_col) else {
        return Ok(HashMap::new());
    };

    let mut mapping = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(schedule::Error::from)?;
        let stop_id = record.get(stop_col).unwrap_or("").trim();
        let stop_name = record.get(name_col).unwrap_or("").trim();
        if stop_id.is_empty() || stop_name.is_empty() {
            continue;
        }
        mapping
            .entry(stop_id.to_string())
            .or_insert_with(|| stop_name.to_string());
    }
    Ok(mapping)
}

/// Expands a normalized query into its saint/st spelling variants.
fn query_keys(key: &str) -> Vec<String> {
    let mut keys = vec![key.to_string()];
    let tokens: Vec<&str> = key.split(' ').collect();
    if tokens.iter().any(|token| *token == "saint") {
        let swapped: Vec<&str> = tokens
            .iter()
            .map(|token| if *token == "saint" { "st" } else { *token })
            .collect();
        keys.push(swapped.join(" "));
    }
    if tokens.iter().any(|token| *token == "st") {
        let swapped: Vec<&str> = tokens
            .iter()
            .map(|token| if *token == "st" { "saint" } else { *token })
            .collect();
        keys.push(swapped.join(" "));
    }
    keys.dedup();
    keys
}

fn has_informative_token(query: &str) -> bool {
    query.split(' ').any(|token| {
        token.chars().count() >= 3 && !GENERIC_TOKENS.contains(&token)
    })
}
