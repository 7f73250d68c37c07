use indexmap::IndexMap;
use std::collections::HashMap;

/// Variant buckets for one token count. `all` holds every variant of that
/// length in load order; `by_first` narrows by the first character.
#[derive(Debug, Default, Clone)]
pub struct Bucket {
    all: Vec<(String, String)>,
    by_first: HashMap<char, Vec<(String, String)>>,
}

impl Bucket {
    pub fn all(&self) -> &[(String, String)] {
        &self.all
    }

    pub fn by_first(&self, first_char: char) -> Option<&[(String, String)]> {
        self.by_first.get(&first_char).map(Vec::as_slice)
    }
}

/// Two-level fuzzy lookup index over gazetteer variants, keyed by token
/// count and first character. The union of the buckets is the full alias
/// set: the first-character bucket bounds the common case, and the full
/// per-length bucket backs it up when the first character itself is wrong.
#[derive(Debug, Default, Clone)]
pub struct PlaceIndex {
    buckets: HashMap<usize, Bucket>,
    max_tokens: usize,
}

impl PlaceIndex {
    pub fn build(mapping: &IndexMap<String, String>) -> Self {
        let mut buckets: HashMap<usize, Bucket> = HashMap::new();
        let mut max_tokens = 1;
        for (variant, canonical) in mapping {
            let count = variant.split(' ').count();
            max_tokens = max_tokens.max(count);
            let bucket = buckets.entry(count).or_default();
            bucket.all.push((variant.clone(), canonical.clone()));
            if let Some(first) = variant.chars().next() {
                bucket
                    .by_first
                    .entry(first)
                    .or_default()
                    .push((variant.clone(), canonical.clone()));
            }
        }
        Self { buckets, max_tokens }
    }

    pub fn bucket(&self, token_count: usize) -> Option<&Bucket> {
        self.buckets.get(&token_count)
    }

    /// The largest token count across all variants, bounding the sliding
    /// window at query time.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}
