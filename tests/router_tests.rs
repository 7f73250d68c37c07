use std::collections::HashSet;
use trajet::graph::{GraphBuilder, StopGraph};
use trajet::router::{Router, shortest_path};
use trajet::schedule::Table;
use trajet::stops::StopIndex;

fn graph(data: &str) -> StopGraph {
    let mut table = Table::from_reader(data.as_bytes(), b',').unwrap();
    GraphBuilder::new().build_from_table(&mut table).unwrap()
}

fn chain() -> StopGraph {
    graph(
        "trip_id,stop_id,stop_sequence\n\
         T1,StopArea:A,1\n\
         T1,StopArea:B,2\n\
         T1,StopArea:C,3\n",
    )
}

fn targets(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn finds_shortest_chain_path() {
    let graph = chain();
    let path = shortest_path(
        &graph,
        &["StopArea:A".to_string()],
        &targets(&["StopArea:C"]),
    );
    assert_eq!(
        path,
        Some(vec![
            "StopArea:A".to_string(),
            "StopArea:B".to_string(),
            "StopArea:C".to_string(),
        ])
    );
}

#[test]
fn source_in_targets_is_a_one_node_path() {
    let graph = chain();
    let path = shortest_path(
        &graph,
        &["StopArea:B".to_string()],
        &targets(&["StopArea:B"]),
    );
    assert_eq!(path, Some(vec!["StopArea:B".to_string()]));
}

#[test]
fn disconnected_endpoints_yield_nothing() {
    let graph = graph(
        "trip_id,stop_id,stop_sequence\n\
         T1,A,1\n\
         T1,B,2\n\
         T2,X,1\n\
         T2,Y,2\n",
    );
    let path = shortest_path(&graph, &["A".to_string()], &targets(&["Y"]));
    assert_eq!(path, None);
}

#[test]
fn unknown_source_yields_nothing() {
    let graph = chain();
    let path = shortest_path(&graph, &["StopArea:Z".to_string()], &targets(&["StopArea:C"]));
    assert_eq!(path, None);
}

#[test]
fn path_has_minimum_hops_with_sorted_tie_break() {
    // Two three-hop routes (A-B-D, A-C-D) and one long detour (A-E-F-D);
    // sorted adjacency makes the B branch win the tie.
    let graph = graph(
        "trip_id,stop_id,stop_sequence\n\
         T1,A,1\n\
         T1,B,2\n\
         T1,D,3\n\
         T2,A,1\n\
         T2,C,2\n\
         T2,D,3\n\
         T3,A,1\n\
         T3,E,2\n\
         T3,F,3\n\
         T3,D,4\n",
    );
    let path = shortest_path(&graph, &["A".to_string()], &targets(&["D"])).unwrap();
    assert_eq!(path, ["A", "B", "D"]);
}

#[test]
fn consecutive_path_elements_are_adjacent() {
    let graph = graph(
        "trip_id,stop_id,stop_sequence\n\
         T1,A,1\n\
         T1,B,2\n\
         T1,C,3\n\
         T2,B,1\n\
         T2,D,2\n\
         T2,E,3\n",
    );
    let path = shortest_path(&graph, &["A".to_string()], &targets(&["E"])).unwrap();
    for pair in path.windows(2) {
        assert!(
            graph.neighbors(&pair[0]).contains(&pair[1]),
            "{} and {} are not adjacent",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn multi_source_search_starts_from_every_resolved_stop() {
    // "Gare A" names two stop areas; only A2 is connected to the target.
    let graph = graph(
        "trip_id,stop_id,stop_sequence\n\
         T1,A2,1\n\
         T1,C,2\n",
    );
    let index = StopIndex::from_areas(&[
        ("A1".to_string(), "Gare A".to_string()),
        ("A2".to_string(), "Gare A".to_string()),
        ("C".to_string(), "Gare C".to_string()),
    ]);
    let router = Router::new(&graph, &index);
    assert_eq!(
        router.find_route("Gare A", "Gare C"),
        Some(vec!["A2".to_string(), "C".to_string()])
    );
}

#[test]
fn id_mode_bypasses_the_name_index() {
    let graph = chain();
    let index = StopIndex::default();
    let router = Router::new(&graph, &index);
    assert_eq!(
        router.find_route_ids("StopArea:A", "StopArea:B"),
        Some(vec!["StopArea:A".to_string(), "StopArea:B".to_string()])
    );
    assert_eq!(router.find_route("StopArea:A", "StopArea:B"), None);
}
