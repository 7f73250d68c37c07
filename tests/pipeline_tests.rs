use std::collections::HashMap;
use trajet::gazetteer::Gazetteer;
use trajet::graph::GraphBuilder;
use trajet::pipeline::{Pipeline, Status, parse_sentence_line};
use trajet::resolver::Resolver;
use trajet::schedule::Table;
use trajet::stops::StopIndex;

const PLACES: &str = "Paris\nLyon\nStrasbourg\nTours\nMarseille\nNice\n";

const STOP_TIMES: &str = "trip_id,stop_id,stop_sequence\n\
    T1,StopArea:STRASBOURG,1\n\
    T1,StopArea:PARIS,2\n\
    T1,StopArea:LYON,3\n\
    T1,StopArea:TOURS,4\n";

fn fixture_areas() -> Vec<(String, String)> {
    [
        ("StopArea:STRASBOURG", "Strasbourg"),
        ("StopArea:PARIS", "Paris"),
        ("StopArea:LYON", "Lyon"),
        ("StopArea:TOURS", "Tours"),
    ]
    .iter()
    .map(|(id, name)| (id.to_string(), name.to_string()))
    .collect()
}

fn pipeline() -> Pipeline {
    let resolver =
        Resolver::new(Gazetteer::from_reader(PLACES.as_bytes()).unwrap()).unwrap();
    let mut table = Table::from_reader(STOP_TIMES.as_bytes(), b',').unwrap();
    let graph = GraphBuilder::new().build_from_table(&mut table).unwrap();
    let areas = fixture_areas();
    let index = StopIndex::from_areas(&areas);
    let stop_names: HashMap<String, String> = areas.into_iter().collect();
    Pipeline::new(resolver, graph, index, stop_names)
}

#[test]
fn order_resolves_and_routes() {
    let pipeline = pipeline();
    let processed = pipeline.process("1", "Je voudrais aller de Paris à Lyon");
    assert_eq!(processed.status, Status::Ok);
    assert_eq!(processed.nlp_row.join(","), "1,Paris,Lyon");
    assert_eq!(processed.path_row.join(","), "1,Paris,Lyon");
}

#[test]
fn routed_path_walks_intermediate_stops() {
    let pipeline = pipeline();
    let processed = pipeline.process("2", "comment aller à Tours depuis Strasbourg");
    assert_eq!(processed.nlp_row.join(","), "2,Strasbourg,Tours");
    assert_eq!(
        processed.path_row.join(","),
        "2,Strasbourg,Paris,Lyon,Tours"
    );
}

#[test]
fn id_output_replaces_readable_names() {
    let resolver =
        Resolver::new(Gazetteer::from_reader(PLACES.as_bytes()).unwrap()).unwrap();
    let mut table = Table::from_reader(STOP_TIMES.as_bytes(), b',').unwrap();
    let graph = GraphBuilder::new().build_from_table(&mut table).unwrap();
    let areas = fixture_areas();
    let index = StopIndex::from_areas(&areas);
    let pipeline = Pipeline::new(resolver, graph, index, HashMap::new()).with_output_ids(true);

    let processed = pipeline.process("1", "Je voudrais aller de Paris à Lyon");
    assert_eq!(
        processed.path_row.join(","),
        "1,StopArea:PARIS,StopArea:LYON"
    );
}

#[test]
fn unresolvable_sentence_is_invalid_on_both_outputs() {
    let pipeline = pipeline();
    let processed = pipeline.process("4", "bonjour je voulais juste demander");
    assert_eq!(processed.status, Status::NlpInvalid);
    assert_eq!(processed.nlp_row.join(","), "4,INVALID,");
    assert_eq!(processed.path_row.join(","), "4,INVALID,");
}

#[test]
fn english_only_sentence_is_invalid() {
    let pipeline = pipeline();
    let processed = pipeline.process("5", "from Paris to Lyon");
    assert_eq!(processed.status, Status::NlpInvalid);
    assert_eq!(processed.nlp_row.join(","), "5,INVALID,");
}

#[test]
fn unroutable_pair_keeps_nlp_output() {
    let pipeline = pipeline();
    let processed = pipeline.process("8", "je veux aller de Nice a Paris");
    assert_eq!(processed.status, Status::PathInvalid);
    assert_eq!(processed.nlp_row.join(","), "8,Nice,Paris");
    assert_eq!(processed.path_row.join(","), "8,INVALID,");
}

#[test]
fn parse_sentence_line_splits_on_first_comma() {
    assert_eq!(
        parse_sentence_line("12,je veux aller de Paris à Lyon, vite"),
        Some(("12", "je veux aller de Paris à Lyon, vite"))
    );
    assert_eq!(parse_sentence_line("no comma here"), None);
    assert_eq!(parse_sentence_line(",missing id"), None);
    assert_eq!(parse_sentence_line("13,"), None);
    assert_eq!(parse_sentence_line(""), None);
}

#[test]
fn stream_order_is_preserved() {
    let pipeline = pipeline();
    let lines = [
        "1,Je voudrais aller de Paris à Lyon",
        "2,comment aller à Tours depuis Strasbourg",
        "3,bonjour je voulais juste demander",
    ];
    let ids: Vec<String> = lines
        .iter()
        .filter_map(|line| parse_sentence_line(line))
        .map(|(id, sentence)| pipeline.process(id, sentence).nlp_row[0].clone())
        .collect();
    assert_eq!(ids, ["1", "2", "3"]);
}
