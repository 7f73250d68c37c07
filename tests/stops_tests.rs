use trajet::schedule::Table;
use trajet::stops::{self, StopIndex};

fn index(areas: &[(&str, &str)]) -> StopIndex {
    let areas: Vec<(String, String)> = areas
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();
    StopIndex::from_areas(&areas)
}

#[test]
fn exact_lookup() {
    let index = index(&[("StopArea:A", "Gare A"), ("StopArea:B", "Gare B")]);
    assert_eq!(index.resolve_stop_ids("Gare A"), ["StopArea:A"]);
    assert_eq!(index.resolve_stop_ids("gare  a"), ["StopArea:A"]);
}

#[test]
fn same_name_unions_stop_ids() {
    let index = index(&[("StopArea:A1", "Gare A"), ("StopArea:A2", "Gare A")]);
    assert_eq!(index.resolve_stop_ids("Gare A"), ["StopArea:A1", "StopArea:A2"]);
}

#[test]
fn prefix_fallback_unions_matches() {
    let index = index(&[
        ("StopArea:PARIS_LYON", "Paris Gare de Lyon"),
        ("StopArea:PARIS_MONTP", "Paris Montparnasse"),
        ("StopArea:LYON", "Lyon Part Dieu"),
    ]);
    assert_eq!(
        index.resolve_stop_ids("Paris"),
        ["StopArea:PARIS_LYON", "StopArea:PARIS_MONTP"]
    );
}

#[test]
fn saint_abbreviation_fallback() {
    let index = index(&[("StopArea:ST_ETIENNE", "St-Etienne Ch teaucreux")]);
    assert_eq!(
        index.resolve_stop_ids("Saint-Etienne"),
        ["StopArea:ST_ETIENNE"]
    );
}

#[test]
fn saint_expansion_fallback() {
    let index = index(&[("StopArea:SAINT_MALO", "Saint Malo")]);
    assert_eq!(index.resolve_stop_ids("St Malo"), ["StopArea:SAINT_MALO"]);
}

#[test]
fn fuzzy_prefix_recovers_typos() {
    let index = index(&[
        ("StopArea:MARSEILLE", "Marseille St Charles"),
        ("StopArea:LYON", "Lyon Part Dieu"),
    ]);
    assert_eq!(
        index.resolve_stop_ids("Marseile St Charles"),
        ["StopArea:MARSEILLE"]
    );
}

#[test]
fn fuzzy_prefix_requires_an_informative_token() {
    let index = index(&[
        ("StopArea:A", "Gare A"),
        ("StopArea:B", "Gare B"),
        ("StopArea:C", "Gare C"),
    ]);
    // "gare x" is one edit from every entry, but carries no informative
    // token, so the fuzzy rung must not fire.
    assert_eq!(index.resolve_stop_ids("Gare X"), Vec::<String>::new());
}

#[test]
fn substring_fallback() {
    let index = index(&[("StopArea:AUSTERLITZ", "Paris Austerlitz Bercy")]);
    assert_eq!(
        index.resolve_stop_ids("Austerlitz"),
        ["StopArea:AUSTERLITZ"]
    );
}

#[test]
fn unknown_name_resolves_to_nothing() {
    let index = index(&[("StopArea:A", "Gare A")]);
    assert!(index.resolve_stop_ids("Quimper").is_empty());
    assert!(index.resolve_stop_ids("").is_empty());
}

#[test]
fn read_areas_keeps_stations_and_untyped_rows() {
    let data = "stop_id;stop_name;location_type\n\
                A;Gare A;1\n\
                A1;Gare A quai 1;0\n\
                B;Gare B;\n\
                C;Gare C;1\n";
    let mut table = Table::from_reader(data.as_bytes(), b';').unwrap();
    let areas = stops::read_areas(&mut table, None).unwrap();
    assert_eq!(
        areas,
        vec![
            ("A".to_string(), "Gare A".to_string()),
            ("B".to_string(), "Gare B".to_string()),
            ("C".to_string(), "Gare C".to_string()),
        ]
    );
}

#[test]
fn read_areas_honors_limit() {
    let data = "stop_id,stop_name\nA,Gare A\nB,Gare B\nC,Gare C\n";
    let mut table = Table::from_reader(data.as_bytes(), b',').unwrap();
    let areas = stops::read_areas(&mut table, Some(2)).unwrap();
    assert_eq!(areas.len(), 2);
}

#[test]
fn read_areas_requires_name_columns() {
    let data = "stop_id,location_type\nA,1\n";
    let mut table = Table::from_reader(data.as_bytes(), b',').unwrap();
    assert!(stops::read_areas(&mut table, None).is_err());
}

#[test]
fn index_artifact_shape() {
    let index = index(&[
        ("StopArea:A1", "Gare A"),
        ("StopArea:A2", "Gare A"),
        ("StopArea:B", "Gare B"),
    ]);
    let value = serde_json::to_value(&index).unwrap();
    assert_eq!(value["gare a"]["names"][0], "Gare A");
    assert_eq!(value["gare a"]["stop_ids"][0], "StopArea:A1");
    assert_eq!(value["gare a"]["stop_ids"][1], "StopArea:A2");
    assert_eq!(value["gare b"]["stop_ids"][0], "StopArea:B");

    let restored: StopIndex = serde_json::from_value(value).unwrap();
    assert_eq!(restored.resolve_stop_ids("Gare B"), ["StopArea:B"]);
}
