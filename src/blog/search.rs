//! Weighted full-text ranking.
//!
//! Each post is treated as a single document whose title words carry weight
//! [`TITLE_WEIGHT`] and body words [`BODY_WEIGHT`]. Every query term must
//! occur in the document. A term's score decays with each further
//! occurrence (1, 1/4, 1/9, ...) and is normalised by ζ(2), so a single
//! title hit scores about 0.61 and a single body hit about 0.24. The post's
//! rank is the mean of its term scores.

use std::cmp::Ordering;

use super::types::Post;

/// Weight of words in the title.
pub const TITLE_WEIGHT: f64 = 1.0;
/// Weight of words in the body.
pub const BODY_WEIGHT: f64 = 0.4;
/// Results ranked below this are dropped.
pub const MIN_RANK: f64 = 0.1;

/// ζ(2) = π²/6
const ZETA_2: f64 = 1.644_934_066_85;

/// Common English words that never count as search terms.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "any", "are", "as", "at", "be", "been", "but",
    "by", "can", "did", "do", "does", "for", "from", "had", "has", "have", "he", "her", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no", "not", "of", "on", "or",
    "our", "she", "so", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "to", "too", "up", "was", "we", "were", "what", "when", "where", "which",
    "who", "why", "will", "with", "you", "your",
];

/// A ranked search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub post: Post,
    pub rank: f64,
}

/// Split text into lowercase alphanumeric words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `word` (lowercase) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Distinct search terms of a query, in order of first appearance.
///
/// Returns an empty list for a blank query or one made only of stop words.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in tokenize(query) {
        if !is_stop_word(&word) && !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

/// Rank of a document of `(word, weight)` pairs in position order.
///
/// Returns `None` when some term does not occur.
fn rank_document(document: &[(String, f64)], terms: &[String]) -> Option<f64> {
    if terms.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for term in terms {
        let weights: Vec<f64> = document
            .iter()
            .filter(|(word, _)| word == term)
            .map(|(_, weight)| *weight)
            .collect();
        total += term_score(&weights)?;
    }

    Some(total / terms.len() as f64)
}

/// Score of one term given the weights of its occurrences in position order.
///
/// The heaviest occurrence counts in full in place of its decayed share.
fn term_score(weights: &[f64]) -> Option<f64> {
    if weights.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    let mut max_weight = 0.0;
    let mut max_index = 0usize;

    for (j, &weight) in weights.iter().enumerate() {
        let denom = ((j + 1) * (j + 1)) as f64;
        sum += weight / denom;
        if weight > max_weight {
            max_weight = weight;
            max_index = j;
        }
    }

    let max_denom = ((max_index + 1) * (max_index + 1)) as f64;
    Some((max_weight + sum - max_weight / max_denom) / ZETA_2)
}

/// Weighted words of a post: title first, then body.
fn document(post: &Post) -> Vec<(String, f64)> {
    tokenize(&post.title)
        .into_iter()
        .map(|w| (w, TITLE_WEIGHT))
        .chain(tokenize(&post.body).into_iter().map(|w| (w, BODY_WEIGHT)))
        .collect()
}

/// Rank of a single post against the query terms, if it matches all of them.
pub fn rank_post(post: &Post, terms: &[String]) -> Option<f64> {
    rank_document(&document(post), terms)
}

/// Rank candidate posts, drop weak matches and order best first.
///
/// Ties are broken by publish date, newest first.
pub fn rank_posts(candidates: Vec<Post>, terms: &[String]) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|post| {
            let rank = rank_post(&post, terms)?;
            (rank >= MIN_RANK).then_some(SearchHit { post, rank })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.rank
            .partial_cmp(&a.rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
            .then_with(|| b.post.id.cmp(&a.post.id))
    });

    hits
}
