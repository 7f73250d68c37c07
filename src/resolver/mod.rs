mod extract;

pub use extract::*;

use crate::gazetteer::Gazetteer;
use crate::shared::text::{normalize, tokenize};
use regex::Regex;
use std::collections::HashSet;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Ordered origin cues: `(pattern, max_gap_tokens)`. Earlier entries
/// dominate later ones; the gap bounds how many words may sit between the
/// cue and the place that follows it.
const ORIGIN_CUES: [(&str, usize); 5] = [
    (r"\bdepuis\b", 3),
    (r"\ben\s+partant\s+de\b", 1),
    (r"\bpartant\s+de\b", 1),
    (r"\bdepart\b", 1),
    (r"\bde\b", 1),
];

/// Ordered destination cues.
const DEST_CUES: [(&str, usize); 5] = [
    (r"\ba\b", 1),
    (r"\bvers\b", 1),
    (r"\bpour\b", 1),
    (r"\bjusqu\s*a\b", 1),
    (r"\bdestination\b", 1),
];

/// French intent markers that permit the positional fallback when no cue
/// produced a candidate.
const FALLBACK_MARKERS: [&str; 18] = [
    "je",
    "veux",
    "voudrais",
    "souhaite",
    "aller",
    "rendre",
    "train",
    "trains",
    "trajet",
    "depart",
    "destination",
    "besoin",
    "gare",
    "billet",
    "partir",
    "partant",
    "depuis",
    "faire",
];

const ENGLISH_MARKERS: [&str; 4] = ["from", "to", "going", "any"];

const FRENCH_MARKERS: [&str; 15] = [
    "depuis",
    "vers",
    "pour",
    "aller",
    "rendre",
    "billet",
    "partir",
    "partant",
    "gare",
    "trajet",
    "depart",
    "destination",
    "besoin",
    "voudrais",
    "souhaite",
];

struct Cue {
    /// Cue + bounded gap + anchored place group, for the exact pass.
    matcher: Regex,
    /// Cue alone, for the fuzzy sweep.
    bare: Regex,
}

/// Rule-based travel-order resolver: normalizes a sentence, extracts place
/// mentions (exact then fuzzy) and arbitrates them with the cue grammar into
/// an (origin, destination) pair. Built once per gazetteer and reused.
pub struct Resolver {
    gazetteer: Gazetteer,
    origin_cues: Vec<Cue>,
    dest_cues: Vec<Cue>,
}

impl Resolver {
    pub fn new(gazetteer: Gazetteer) -> Result<Self, Error> {
        let now = Instant::now();
        let place = gazetteer.pattern().as_str();
        let origin_cues = compile_cues(&ORIGIN_CUES, place)?;
        let dest_cues = compile_cues(&DEST_CUES, place)?;
        debug!("Compiling cue grammar took {:?}", now.elapsed());
        Ok(Self {
            gazetteer,
            origin_cues,
            dest_cues,
        })
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Resolves a sentence to an (origin, destination) pair. `None` is the
    /// rejection outcome, not an error.
    pub fn resolve(&self, sentence: &str) -> Option<(String, String)> {
        let sentence = normalize(sentence);
        let place_spans = extract_place_spans(&sentence, &self.gazetteer);

        let mut origin_candidates =
            self.collect_candidates(&sentence, &self.origin_cues, &place_spans);
        let mut dest_candidates = self.collect_candidates(&sentence, &self.dest_cues, &place_spans);
        if origin_candidates.is_empty() {
            origin_candidates =
                self.collect_fuzzy_candidates(&sentence, &self.origin_cues, &place_spans);
        }
        if dest_candidates.is_empty() {
            dest_candidates = self.collect_fuzzy_candidates(&sentence, &self.dest_cues, &place_spans);
        }

        let mut all_places = extract_places(&sentence, &self.gazetteer);
        let tokens: HashSet<&str> = sentence.split(' ').collect();
        let marker_hit = FALLBACK_MARKERS.iter().any(|m| tokens.contains(m));
        let english_hit = ENGLISH_MARKERS.iter().any(|m| tokens.contains(m));
        let french_hit = FRENCH_MARKERS.iter().any(|m| tokens.contains(m));
        let any_candidate = !origin_candidates.is_empty() || !dest_candidates.is_empty();

        if english_hit && !french_hit && !any_candidate {
            return None;
        }
        let fallback_allowed = any_candidate || marker_hit;

        if fallback_allowed && all_places.len() < 2 {
            let mut known: HashSet<String> =
                all_places.iter().map(|(_, place)| place.clone()).collect();
            for (position, place) in extract_places_fuzzy(&sentence, self.gazetteer.index()) {
                if known.insert(place.clone()) {
                    all_places.push((position, place));
                }
            }
            all_places.sort_by_key(|(position, _)| *position);
        }

        let mut ordered: Vec<String> = Vec::new();
        for (_, place) in &all_places {
            if !ordered.contains(place) {
                ordered.push(place.clone());
            }
        }

        // Rightmost candidate wins: in free French orders such as
        // "comment aller a X depuis Y", the later cue overrides.
        let mut origin = origin_candidates.last().map(|(_, place)| place.clone());
        let mut destination = dest_candidates.last().map(|(_, place)| place.clone());

        if origin.is_none() && !ordered.is_empty() && fallback_allowed {
            origin = Some(ordered[0].clone());
        }
        if destination.is_none() && fallback_allowed {
            destination = match &origin {
                None => ordered.get(1).cloned(),
                Some(origin) => ordered.iter().find(|place| *place != origin).cloned(),
            };
        }

        match (origin, destination) {
            (Some(origin), Some(destination))
                if !origin.is_empty() && !destination.is_empty() && origin != destination =>
            {
                Some((origin, destination))
            }
            _ => None,
        }
    }

    /// Exact pass: for each cue in preference order, every occurrence with a
    /// place anchored after a bounded gap. Deduplicated by (offset,
    /// canonical), sorted by offset.
    fn collect_candidates(
        &self,
        sentence: &str,
        cues: &[Cue],
        blocked: &[(usize, usize)],
    ) -> Vec<Mention> {
        let mut candidates: Vec<Mention> = Vec::new();
        let mut seen: HashSet<Mention> = HashSet::new();
        for cue in cues {
            for caps in cue.matcher.captures_iter(sentence) {
                let Some(whole) = caps.get(0) else { continue };
                if in_spans(whole.start(), blocked) {
                    continue;
                }
                let Some(place) = caps.name("place") else {
                    continue;
                };
                let raw = collapse(place.as_str());
                if let Some(canonical) = self.gazetteer.canonical(&raw) {
                    let mention = (place.start(), canonical.to_string());
                    if seen.insert(mention.clone()) {
                        candidates.push(mention);
                    }
                }
            }
        }
        candidates.sort_by_key(|(position, _)| *position);
        candidates
    }

    /// Fuzzy sweep: run when the exact pass yields nothing for a role. Each
    /// cue occurrence anchors a window search starting at the first token
    /// after the cue; the gap bound does not apply here.
    fn collect_fuzzy_candidates(
        &self,
        sentence: &str,
        cues: &[Cue],
        blocked: &[(usize, usize)],
    ) -> Vec<Mention> {
        let tokens = tokenize(sentence);
        if tokens.is_empty() {
            return Vec::new();
        }
        let mut candidates: Vec<Mention> = Vec::new();
        let mut seen: HashSet<Mention> = HashSet::new();
        for cue in cues {
            for found in cue.bare.find_iter(sentence) {
                if in_spans(found.start(), blocked) {
                    continue;
                }
                let Some(start) = tokens.iter().position(|token| token.start >= found.end())
                else {
                    continue;
                };
                if let Some((position, canonical, _)) =
                    best_window_match(&tokens, start, self.gazetteer.index())
                {
                    let mention = (position, canonical);
                    if seen.insert(mention.clone()) {
                        candidates.push(mention);
                    }
                }
            }
        }
        candidates.sort_by_key(|(position, _)| *position);
        candidates
    }
}

fn compile_cues(specs: &[(&str, usize)], place: &str) -> Result<Vec<Cue>, regex::Error> {
    specs
        .iter()
        .map(|(pattern, max_gap)| {
            let matcher = Regex::new(&format!(
                r"(?:{pattern})(?:\s+\w+){{0,{max_gap}}}\s+(?P<place>{place})"
            ))?;
            let bare = Regex::new(pattern)?;
            Ok(Cue { matcher, bare })
        })
        .collect()
}
