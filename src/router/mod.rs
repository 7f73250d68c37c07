use crate::{graph::StopGraph, stops::StopIndex};
use std::collections::{HashMap, HashSet, VecDeque};

/// Name-level pathfinding over a stop graph: resolves the origin and
/// destination through the stop-name index, then searches for the shortest
/// hop sequence. Borrows the immutable graph and index, so it is cheap to
/// construct per query.
pub struct Router<'a> {
    graph: &'a StopGraph,
    index: &'a StopIndex,
}

impl<'a> Router<'a> {
    pub fn new(graph: &'a StopGraph, index: &'a StopIndex) -> Self {
        Self { graph, index }
    }

    /// Shortest stop-id path between two station names. `None` when either
    /// name resolves to nothing or the endpoints are disconnected.
    pub fn find_route(&self, origin: &str, destination: &str) -> Option<Vec<String>> {
        let sources = self.index.resolve_stop_ids(origin);
        let targets: HashSet<String> = self.index.resolve_stop_ids(destination).into_iter().collect();
        if sources.is_empty() || targets.is_empty() {
            return None;
        }
        shortest_path(self.graph, &sources, &targets)
    }

    /// Shortest path between two raw stop ids, bypassing the name index.
    pub fn find_route_ids(&self, origin_id: &str, destination_id: &str) -> Option<Vec<String>> {
        let sources = vec![origin_id.to_string()];
        let targets = HashSet::from([destination_id.to_string()]);
        shortest_path(self.graph, &sources, &targets)
    }
}

/// Multi-source multi-target breadth-first search. All sources are seeded
/// into the visited map with no parent; the first target popped wins, so
/// the returned path has minimum hop count. A source that is itself a
/// target yields a one-node path.
pub fn shortest_path(
    graph: &StopGraph,
    sources: &[String],
    targets: &HashSet<String>,
) -> Option<Vec<String>> {
    let mut visited: HashMap<String, Option<String>> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for source in sources {
        if !visited.contains_key(source) {
            visited.insert(source.clone(), None);
            queue.push_back(source.clone());
        }
    }

    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            return Some(reconstruct(&visited, current));
        }
        for neighbor in graph.neighbors(&current) {
            if !visited.contains_key(neighbor) {
                visited.insert(neighbor.clone(), Some(current.clone()));
                queue.push_back(neighbor.clone());
            }
        }
    }
    None
}

fn reconstruct(visited: &HashMap<String, Option<String>>, target: String) -> Vec<String> {
    let mut cursor = target.clone();
    let mut path = vec![target];
    while let Some(Some(parent)) = visited.get(&cursor) {
        path.push(parent.clone());
        cursor = parent.clone();
    }
    path.reverse();
    path
}
