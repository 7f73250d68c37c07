mod builder;

pub use builder::*;

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::{self, BufReader, BufWriter},
    path::Path,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schedule error: {0}")]
    Schedule(#[from] crate::schedule::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub node_count: usize,
    /// Counts adjacency entries, so every undirected edge is counted twice.
    pub edge_count: usize,
}

/// Undirected, unweighted stop graph: an edge joins two stops that are
/// consecutive on at least one trip. Adjacency lists are sorted ascending,
/// so traversal order is deterministic. Immutable after construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StopGraph {
    #[serde(default)]
    pub edges: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub meta: Meta,
}

impl StopGraph {
    pub fn neighbors(&self, stop_id: &str) -> &[String] {
        self.edges
            .get(stop_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, stop_id: &str) -> bool {
        self.edges.contains_key(stop_id)
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
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
}
