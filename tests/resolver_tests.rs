use trajet::gazetteer::Gazetteer;
use trajet::resolver::{Resolver, extract_places, extract_places_fuzzy};

fn resolver_with(places: &str) -> Resolver {
    let gazetteer = Gazetteer::from_reader(places.as_bytes()).unwrap();
    Resolver::new(gazetteer).unwrap()
}

fn resolver() -> Resolver {
    resolver_with("Paris\nLyon\nStrasbourg\nTours\nMarseille\nNice\n")
}

fn pair(origin: &str, destination: &str) -> Option<(String, String)> {
    Some((origin.to_string(), destination.to_string()))
}

#[test]
fn resolves_simple_order() {
    let resolver = resolver();
    assert_eq!(
        resolver.resolve("Je voudrais aller de Paris à Lyon"),
        pair("Paris", "Lyon")
    );
}

#[test]
fn rightmost_cue_wins() {
    let resolver = resolver();
    assert_eq!(
        resolver.resolve("comment aller à Tours depuis Strasbourg"),
        pair("Strasbourg", "Tours")
    );
}

#[test]
fn first_letter_typo_is_recovered() {
    let resolver = resolver_with("Strasbourg\nTours\nLyon\n");
    assert_eq!(
        resolver.resolve("comment aller a Tours depuis trasbourg"),
        pair("Strasbourg", "Tours")
    );
}

#[test]
fn typo_within_tolerance_is_recovered() {
    let resolver = resolver();
    assert_eq!(
        resolver.resolve("je veux aller de Marseile vers Paris"),
        pair("Marseille", "Paris")
    );
}

#[test]
fn chatter_is_rejected() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("bonjour je voulais juste demander"), None);
}

#[test]
fn english_only_order_is_rejected() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("from Paris to Lyon"), None);
}

#[test]
fn empty_sentence_is_rejected() {
    let resolver = resolver();
    assert_eq!(resolver.resolve(""), None);
    assert_eq!(resolver.resolve("   "), None);
}

#[test]
fn single_place_is_rejected() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("je veux un billet pour Paris"), None);
}

#[test]
fn positional_fallback_orders_places() {
    let resolver = resolver();
    assert_eq!(
        resolver.resolve("je voudrais un trajet Paris Lyon"),
        pair("Paris", "Lyon")
    );
}

#[test]
fn multi_token_alias_resolves_to_canonical() {
    let resolver = resolver_with("Paris\nMarseille\nGare de Lyon|Paris\n");
    assert_eq!(
        resolver.resolve("je veux aller de gare de lyon a marseille"),
        pair("Paris", "Marseille")
    );
}

#[test]
fn origin_never_equals_destination() {
    let resolver = resolver();
    for sentence in [
        "je veux aller de Paris a Paris",
        "billet pour Lyon depuis Lyon",
        "je voudrais aller a Tours",
    ] {
        assert_eq!(resolver.resolve(sentence), None, "sentence: {sentence}");
    }
}

#[test]
fn resolution_is_deterministic() {
    let resolver = resolver();
    let sentence = "comment aller à Tours depuis Strasbourg";
    let first = resolver.resolve(sentence);
    for _ in 0..10 {
        assert_eq!(resolver.resolve(sentence), first);
    }
}

#[test]
fn exact_mentions_are_a_subset_of_fuzzy_mentions() {
    let gazetteer =
        Gazetteer::from_reader("Paris\nLyon\nStrasbourg\nTours\n".as_bytes()).unwrap();
    let sentence = "je vais de paris a lyon puis strasbourg";
    let exact = extract_places(sentence, &gazetteer);
    let fuzzy = extract_places_fuzzy(sentence, gazetteer.index());
    for mention in &exact {
        assert!(
            fuzzy.contains(mention),
            "exact mention {mention:?} missing from fuzzy sweep"
        );
    }
}

#[test]
fn accented_input_matches_plain_alias() {
    let resolver = resolver_with("Orleans\nBesancon\n");
    assert_eq!(
        resolver.resolve("je veux aller de Besançon à Orléans"),
        pair("Besancon", "Orleans")
    );
}
