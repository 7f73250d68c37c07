use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes free-form text into the canonical matching form: lowercased,
/// NFD-decomposed with combining marks removed, anything outside
/// `[a-z0-9\s-]` flattened to a space, hyphens flattened, whitespace
/// collapsed. Idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered.nfd().filter(|ch| !is_combining_mark(*ch)).collect();
    let flattened: String = stripped
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' => ch,
            ch if ch.is_whitespace() => ch,
            _ => ' ',
        })
        .collect();
    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A word token inside a normalized sentence, with its byte span.
/// Normalized text is pure ASCII so byte offsets equal character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Splits a normalized sentence into word tokens with positions.
pub fn tokenize(sentence: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in sentence.char_indices() {
        if ch.is_ascii_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(Token {
                text: &sentence[s..i],
                start: s,
                end: i,
            });
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &sentence[s..],
            start: s,
            end: sentence.len(),
        });
    }
    tokens
}

#[test]
fn normalize_lowercases() {
    assert_eq!(normalize("PARIS"), "paris");
}

#[test]
fn normalize_strips_diacritics() {
    assert_eq!(normalize("Orléans Ménilmontant"), "orleans menilmontant");
}

#[test]
fn normalize_flattens_hyphens() {
    assert_eq!(normalize("Saint-Étienne"), "saint etienne");
}

#[test]
fn normalize_flattens_punctuation() {
    assert_eq!(normalize("où ? Gare, s.v.p !"), "ou gare s v p");
}

#[test]
fn normalize_collapses_whitespace() {
    assert_eq!(normalize("  gare \t de\n lyon  "), "gare de lyon");
}

#[test]
fn normalize_is_idempotent() {
    for raw in ["Château-Thierry", "  L'Isle--Adam ", "Besançon TGV", ""] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn tokenize_positions() {
    let tokens = tokenize("aller a tours");
    let spans: Vec<_> = tokens.iter().map(|t| (t.text, t.start, t.end)).collect();
    assert_eq!(spans, vec![("aller", 0, 5), ("a", 6, 7), ("tours", 8, 13)]);
}

#[test]
fn tokenize_empty() {
    assert!(tokenize("").is_empty());
}
