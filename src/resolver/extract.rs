use crate::gazetteer::{Gazetteer, PlaceIndex};
use crate::shared::{fuzzy, text::Token, text::tokenize};
use std::collections::HashSet;

/// A place occurrence inside a normalized sentence: byte offset of the
/// mention plus the canonical name it resolves to.
pub type Mention = (usize, String);

/// Byte spans of every exact place match; used to keep cue markers that sit
/// inside a place name (e.g. the "a" of "gare a") from spawning candidates.
pub fn extract_place_spans(sentence: &str, gazetteer: &Gazetteer) -> Vec<(usize, usize)> {
    gazetteer
        .pattern()
        .find_iter(sentence)
        .map(|found| (found.start(), found.end()))
        .collect()
}

pub fn in_spans(position: usize, spans: &[(usize, usize)]) -> bool {
    spans
        .iter()
        .any(|(start, end)| *start <= position && position < *end)
}

/// Every non-overlapping exact pattern match mapped to its canonical name.
pub fn extract_places(sentence: &str, gazetteer: &Gazetteer) -> Vec<Mention> {
    gazetteer
        .pattern()
        .find_iter(sentence)
        .filter_map(|found| {
            let raw = collapse(found.as_str());
            gazetteer
                .canonical(&raw)
                .map(|canonical| (found.start(), canonical.to_string()))
        })
        .collect()
}

/// Fuzzy sweep over the whole sentence: at each starting token, the best
/// window of 1..=max_tokens tokens within tolerance, at most one mention per
/// starting position, deduplicated by (offset, canonical).
pub fn extract_places_fuzzy(sentence: &str, index: &PlaceIndex) -> Vec<Mention> {
    let tokens = tokenize(sentence);
    let mut mentions: Vec<Mention> = Vec::new();
    let mut seen: HashSet<Mention> = HashSet::new();
    for start in 0..tokens.len() {
        if let Some((position, canonical, _)) = best_window_match(&tokens, start, index) {
            let mention = (position, canonical);
            if seen.insert(mention.clone()) {
                mentions.push(mention);
            }
        }
    }
    mentions.sort_by_key(|(position, _)| *position);
    mentions
}

/// The minimum-distance variant across all windows starting at `start`.
/// Ties keep the first hit, so shorter windows and earlier gazetteer entries
/// win; a strict improvement is required to switch. Each window scans its
/// first-character bucket first and widens to the whole length bucket only
/// when nothing there passes tolerance, so a typo in the first character is
/// still recoverable.
pub fn best_window_match(
    tokens: &[Token<'_>],
    start: usize,
    index: &PlaceIndex,
) -> Option<(usize, String, usize)> {
    let mut best: Option<(usize, String, usize)> = None;
    for length in 1..=index.max_tokens() {
        if start + length > tokens.len() {
            break;
        }
        let window = &tokens[start..start + length];
        let candidate = window
            .iter()
            .map(|token| token.text)
            .collect::<Vec<_>>()
            .join(" ");
        let Some(bucket) = index.bucket(length) else {
            continue;
        };
        let narrowed = candidate.chars().next().and_then(|ch| bucket.by_first(ch));
        let mut in_tolerance = false;
        if let Some(variants) = narrowed {
            in_tolerance = scan_variants(variants, &candidate, window[0].start, &mut best);
        }
        if !in_tolerance {
            scan_variants(bucket.all(), &candidate, window[0].start, &mut best);
        }
    }
    best
}

/// Scores `candidate` against each variant, keeping the strict minimum in
/// `best`. Returns whether any variant passed its tolerance.
fn scan_variants(
    variants: &[(String, String)],
    candidate: &str,
    position: usize,
    best: &mut Option<(usize, String, usize)>,
) -> bool {
    let mut in_tolerance = false;
    for (variant, canonical) in variants {
        let dist = fuzzy::distance(candidate, variant);
        if dist > fuzzy::max_distance(variant) {
            continue;
        }
        in_tolerance = true;
        if best.as_ref().is_none_or(|(_, _, d)| dist < *d) {
            *best = Some((position, canonical.clone(), dist));
        }
    }
    in_tolerance
}

/// Collapses whitespace runs in a matched slice back to single spaces so it
/// can be looked up as a mapping key.
pub fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
