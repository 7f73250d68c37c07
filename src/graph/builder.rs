use crate::graph::{Error, Meta, StopGraph};
use crate::schedule::{self, Table};
use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    io::Read,
    path::Path,
    time::Instant,
};
use tracing::debug;

/// Maps a stop id to its parent station id. A stop that is itself a station
/// area (location_type 1) maps to itself; a stop with neither parent nor
/// area type also maps to itself.
pub type ParentMap = HashMap<String, Option<String>>;

/// Builds a [`StopGraph`] from a trip-stops table by collapsing per-trip
/// stop sequences to pairwise adjacencies.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    parent_map: ParentMap,
    limit_trips: Option<usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_parent_map(mut self, parent_map: ParentMap) -> Self {
        self.parent_map = parent_map;
        self
    }

    /// Bounds the number of distinct trips read, for experimentation on
    /// large feeds.
    pub fn with_limit_trips(mut self, limit: usize) -> Self {
        self.limit_trips = Some(limit);
        self
    }

    /// Reads a stops table (`stop_id`, optional `parent_station`, optional
    /// `location_type`) into a parent map. A missing file or a missing
    /// `stop_id` column yields an empty map, disabling the collapse.
    pub fn load_parent_map<P: AsRef<Path>>(path: P) -> Result<ParentMap, schedule::Error> {
        if !path.as_ref().exists() {
            return Ok(ParentMap::new());
        }
        let mut table = Table::open(path)?;
        let Some(stop_col) = table.column("stop_id") else {
            return Ok(ParentMap::new());
        };
        let parent_col = table.column("parent_station");
        let location_col = table.column("location_type");

        let mut mapping = ParentMap::new();
        for result in table.records() {
            let record = result?;
            let stop_id = record.get(stop_col).unwrap_or("").trim();
            if stop_id.is_empty() {
                continue;
            }
            let mut parent = parent_col
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            if location_col
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .is_some_and(|value| value == "1")
            {
                parent = Some(stop_id.to_string());
            }
            mapping.insert(stop_id.to_string(), parent);
        }
        Ok(mapping)
    }

    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<StopGraph, Error> {
        let mut table = Table::open(path).map_err(Error::Schedule)?;
        self.build_from_table(&mut table)
    }

    pub fn build_from_table<R: Read>(&self, table: &mut Table<R>) -> Result<StopGraph, Error> {
        let now = Instant::now();
        let trip_col = table.require("trip_id").map_err(Error::Schedule)?;
        let stop_col = table.require("stop_id").map_err(Error::Schedule)?;
        let seq_col = table.column("stop_sequence");

        let mut trips: IndexMap<String, Vec<(i64, String)>> = IndexMap::new();
        for result in table.records() {
            let record = result.map_err(schedule::Error::from)?;
            let trip_id = record.get(trip_col).unwrap_or("").trim();
            let stop_id = record.get(stop_col).unwrap_or("").trim();
            if trip_id.is_empty() || stop_id.is_empty() {
                continue;
            }
            let stop_id = self.remap(stop_id);
            let stops = trips.entry(trip_id.to_string()).or_default();
            let sequence = match seq_col {
                // Unparseable sequence numbers fall back to 0; the sort is
                // stable so insertion order breaks the tie.
                Some(idx) => record
                    .get(idx)
                    .and_then(|value| value.trim().parse::<i64>().ok())
                    .unwrap_or(0),
                None => stops.len() as i64,
            };
            stops.push((sequence, stop_id));
            if self.limit_trips.is_some_and(|limit| trips.len() >= limit) {
                break;
            }
        }

        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (_, mut stops) in trips {
            stops.sort_by_key(|(sequence, _)| *sequence);
            for pair in stops.windows(2) {
                let (a, b) = (&pair[0].1, &pair[1].1);
                if a == b {
                    continue;
                }
                adjacency.entry(a.clone()).or_default().insert(b.clone());
                adjacency.entry(b.clone()).or_default().insert(a.clone());
            }
        }

        let edges: BTreeMap<String, Vec<String>> = adjacency
            .into_iter()
            .map(|(node, neighbors)| (node, neighbors.into_iter().collect()))
            .collect();
        let meta = Meta {
            node_count: edges.len(),
            edge_count: edges.values().map(Vec::len).sum(),
        };
        debug!(
            "Building graph with {} nodes and {} adjacency entries took {:?}",
            meta.node_count,
            meta.edge_count,
            now.elapsed()
        );
        Ok(StopGraph { edges, meta })
    }

    fn remap(&self, stop_id: &str) -> String {
        match self.parent_map.get(stop_id) {
            Some(Some(parent)) => parent.clone(),
            _ => stop_id.to_string(),
        }
    }
}
