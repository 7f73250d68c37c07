use crate::{graph::StopGraph, resolver::Resolver, router::Router, stops::StopIndex};
use std::collections::HashMap;

/// The rejection marker of the external text protocol.
pub const INVALID: &str = "INVALID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NlpInvalid,
    PathInvalid,
}

/// The two output rows produced for one input line.
#[derive(Debug, Clone)]
pub struct Processed {
    pub nlp_row: Vec<String>,
    pub path_row: Vec<String>,
    pub status: Status,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub total: usize,
    pub ok: usize,
    pub nlp_invalid: usize,
    pub path_invalid: usize,
}

impl Counters {
    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Ok => self.ok += 1,
            Status::NlpInvalid => self.nlp_invalid += 1,
            Status::PathInvalid => self.path_invalid += 1,
        }
    }
}

/// The full order pipeline: sentence to (origin, destination) to stop path.
/// Owns the resolver, graph, index and readable-name map; every component
/// is immutable after construction, so one pipeline serves a whole stream.
pub struct Pipeline {
    resolver: Resolver,
    graph: StopGraph,
    index: StopIndex,
    stop_names: HashMap<String, String>,
    output_ids: bool,
}

impl Pipeline {
    pub fn new(
        resolver: Resolver,
        graph: StopGraph,
        index: StopIndex,
        stop_names: HashMap<String, String>,
    ) -> Self {
        Self {
            resolver,
            graph,
            index,
            stop_names,
            output_ids: false,
        }
    }

    /// Emit stop ids on the path output instead of readable names.
    pub fn with_output_ids(mut self, output_ids: bool) -> Self {
        self.output_ids = output_ids;
        self
    }

    pub fn process(&self, id: &str, sentence: &str) -> Processed {
        let Some((origin, destination)) = self.resolver.resolve(sentence) else {
            return Processed {
                nlp_row: invalid_row(id),
                path_row: invalid_row(id),
                status: Status::NlpInvalid,
            };
        };

        let nlp_row = vec![id.to_string(), origin.clone(), destination.clone()];
        let router = Router::new(&self.graph, &self.index);
        let Some(route) = router.find_route(&origin, &destination) else {
            return Processed {
                nlp_row,
                path_row: invalid_row(id),
                status: Status::PathInvalid,
            };
        };

        let mut path_row = vec![id.to_string()];
        if self.output_ids {
            path_row.extend(route);
        } else {
            path_row.extend(
                route
                    .iter()
                    .map(|stop_id| self.readable(stop_id).to_string()),
            );
        }
        Processed {
            nlp_row,
            path_row,
            status: Status::Ok,
        }
    }

    fn readable<'a>(&'a self, stop_id: &'a str) -> &'a str {
        self.stop_names
            .get(stop_id)
            .map(String::as_str)
            .unwrap_or(stop_id)
    }
}

/// Splits `id,sentence` on the first comma. Lines with no comma or an empty
/// id or sentence are malformed and skipped by callers.
pub fn parse_sentence_line(line: &str) -> Option<(&str, &str)> {
    let (id, sentence) = line.split_once(',')?;
    let id = id.trim();
    let sentence = sentence.trim();
    if id.is_empty() || sentence.is_empty() {
        return None;
    }
    Some((id, sentence))
}

pub fn invalid_row(id: &str) -> Vec<String> {
    vec![id.to_string(), INVALID.to_string(), String::new()]
}
