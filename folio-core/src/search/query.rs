//! Query-time matching against a loaded [`SearchIndex`].

use super::{char_grams, SearchIndex, GRAM_SIZE};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Query tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of hits returned
    pub limit: usize,

    /// Largest tolerated ratio of edits to query length (0 = exact)
    pub threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            threshold: 0.4,
        }
    }
}

/// A ranked query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Position of the document in the indexed collection
    pub position: usize,
    pub slug: String,
    pub score: f64,

    /// Names of the keys that matched
    pub matched: Vec<String>,
}

/// Minimum edit distance between `pattern` and any substring of `text`
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();

    // prev[i]: cost of matching pattern[..i] ending at the previous text char
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut best = prev[m];

    for &c in text {
        let mut cur = vec![0; m + 1];
        for i in 1..=m {
            let substitution = prev[i - 1] + usize::from(pattern[i - 1] != c);
            cur[i] = substitution.min(prev[i] + 1).min(cur[i - 1] + 1);
        }
        best = best.min(cur[m]);
        prev = cur;
    }

    best
}

impl SearchIndex {
    /// Rank indexed documents against `query`
    ///
    /// Each key contributes its weight times how closely the query matches
    /// somewhere in that field. Ties fall back to the norm-weighted score and
    /// then to document position.
    pub fn search(&self, query: &str, opts: &SearchOptions) -> Vec<SearchHit> {
        let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
        if pattern.is_empty() || opts.limit == 0 {
            return Vec::new();
        }

        let max_errors = (opts.threshold.max(0.0) * pattern.len() as f64).floor() as usize;
        let candidates = self.candidates(&pattern, max_errors);

        let mut scored: Vec<(SearchHit, f64)> = Vec::new();
        for (record_index, record) in self.records.iter().enumerate() {
            let mut score = 0.0;
            let mut tie_break = 0.0;
            let mut matched = Vec::new();

            for (key_index, (key, text)) in self.keys.iter().zip(&record.fields).enumerate() {
                if let Some(candidates) = &candidates {
                    if !candidates.contains_key(&[record_index as u32, key_index as u32]) {
                        continue;
                    }
                }

                let chars: Vec<char> = text.value.chars().collect();
                let distance = substring_distance(&pattern, &chars);
                if distance > max_errors {
                    continue;
                }

                let quality = 1.0 - distance as f64 / pattern.len() as f64;
                score += key.weight * quality;
                tie_break += key.weight * quality * text.norm;
                matched.push(key.name.clone());
            }

            if !matched.is_empty() {
                scored.push((
                    SearchHit {
                        position: record.position,
                        slug: record.slug.clone(),
                        score,
                        matched,
                    },
                    tie_break,
                ));
            }
        }

        scored.sort_by(|(a, a_tie), (b, b_tie)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b_tie.partial_cmp(a_tie).unwrap_or(Ordering::Equal))
                .then_with(|| a.position.cmp(&b.position))
        });

        scored
            .into_iter()
            .take(opts.limit)
            .map(|(hit, _)| hit)
            .collect()
    }

    /// `[record, key]` pairs that can still match within `max_errors` edits
    ///
    /// A substring within `k` edits of the query shares at least
    /// `len - GRAM_SIZE + 1 - k * GRAM_SIZE` of the query's trigram positions.
    /// Returns `None` when that bound is not positive and every field must be
    /// scanned.
    fn candidates(&self, pattern: &[char], max_errors: usize) -> Option<HashMap<[u32; 2], usize>> {
        let positions = pattern.len().checked_sub(GRAM_SIZE - 1)?;
        let required = positions.checked_sub(max_errors * GRAM_SIZE)?;
        if required == 0 {
            return None;
        }

        let text: String = pattern.iter().collect();
        let mut counts: HashMap<[u32; 2], usize> = HashMap::new();
        for gram in char_grams(&text) {
            if let Some(postings) = self.grams.get(&gram) {
                for posting in postings {
                    *counts.entry(*posting).or_default() += 1;
                }
            }
        }

        counts.retain(|_, count| *count >= required);
        Some(counts)
    }
}
