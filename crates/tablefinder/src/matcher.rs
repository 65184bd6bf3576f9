//! Token-set fuzzy matching of guest names.
//!
//! Names are compared as unordered sets of words, so "Garcia, Maria" and
//! "maria garcia" are the same guest. Scores are on a 0-100 scale.
//!
//! The scorer follows the usual token-set ratio definition: after splitting
//! both strings into sorted word sets, it takes the best Indel similarity
//! among `diff_ab` vs `diff_ba` (each prefixed by the shared words) and the
//! shared words vs each side. A full subset match scores 100.

use std::collections::BTreeSet;

use crate::config::MatcherConfig;

/// The best candidate found for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    /// The candidate name as given.
    pub name: &'a str,
    /// Similarity score, 0-100.
    pub score: f64,
    /// Position of the candidate in the input sequence.
    pub index: usize,
}

/// Finds the best fuzzy match above a score cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    threshold: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default().threshold)
    }
}

impl From<&MatcherConfig> for Matcher {
    fn from(config: &MatcherConfig) -> Self {
        Self::new(config.threshold)
    }
}

impl Matcher {
    /// Create a matcher that accepts scores at or above `threshold`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The minimum accepted score.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return the highest-scoring name with `score >= threshold`.
    ///
    /// Among equal top scores the lowest index wins. Returns `None` when
    /// `names` is empty or nothing reaches the threshold.
    pub fn find<'a, I>(&self, query: &str, names: I) -> Option<Match<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let query = normalize(query);
        let mut best: Option<Match<'a>> = None;

        for (index, name) in names.into_iter().enumerate() {
            let score = token_set_ratio(&query, &normalize(name));
            if score < self.threshold {
                continue;
            }
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Match { name, score, index });
                if score >= 100.0 {
                    break;
                }
            }
        }

        best
    }
}

/// Lowercase, turn everything but letters and digits into spaces, and trim.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Token-set similarity of two already-normalized strings, 0-100.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side is a subset of the other
    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab = diff_ab.join(" ");
    let diff_ba = diff_ba.join(" ");
    let ab_len = diff_ab.chars().count();
    let ba_len = diff_ba.chars().count();
    let sect_len = sect.join(" ").chars().count();

    // Lengths of "sect diff_ab" and "sect diff_ba"
    let sep = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;

    let dist = indel_distance(&diff_ab, &diff_ba);
    let result = normalized_similarity(dist, sect_ab_len + sect_ba_len);
    if sect_len == 0 {
        return result;
    }

    // "sect" vs "sect diff_ab" differ by exactly the appended part
    let sect_ab = normalized_similarity(sep + ab_len, sect_len + sect_ab_len);
    let sect_ba = normalized_similarity(sep + ba_len, sect_len + sect_ba_len);

    result.max(sect_ab).max(sect_ba)
}

/// Insertions plus deletions needed to turn `a` into `b`.
fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                up.max(row[j])
            };
            diag = up;
        }
    }
    row[b.len()]
}

#[allow(clippy::cast_precision_loss)]
fn normalized_similarity(dist: usize, len_sum: usize) -> f64 {
    if len_sum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * dist as f64 / len_sum as f64
}
