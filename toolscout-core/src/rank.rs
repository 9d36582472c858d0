//! Ranking of catalog candidates against a query fingerprint.
//!
//! Every stored (tool, fingerprint) pair is scored independently with
//! an exhaustive linear scan; at the intended scale (hundreds to low
//! thousands of images) that is cheaper than any index would pay for.

use serde::Serialize;

use crate::criteria::{SearchCriteria, SearchMode};
use crate::filter::{bonus, matches, ToolAttributes};
use crate::fingerprint::{distance, Fingerprint};

/// One stored image up for scoring: the owning tool's attributes plus
/// the fingerprint of one of its photos.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub tool_id: i64,
    pub attributes: ToolAttributes,
    pub fingerprint: Fingerprint,
    /// Stable reference to the stored image, handed back for display.
    pub image_ref: String,
}

/// A ranked search hit. Lives for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub tool_id: i64,
    pub attributes: ToolAttributes,
    /// Raw Hamming distance, always in `[0, 64]`.
    pub hamming: u32,
    /// Sort key. Equals `hamming` in strict mode; `hamming - bonus` in
    /// soft mode, which may be negative.
    pub adjusted: i64,
    pub image_ref: String,
}

/// Score, filter, order, and truncate candidates for one query.
///
/// Strict mode drops candidates failing [`matches`] and uses the raw
/// distance as the score. Soft mode keeps everything and subtracts the
/// criteria [`bonus`] from the distance. Ties on the adjusted score are
/// broken by raw distance, preferring the visually closer match; the
/// sort is stable beyond that, so the outcome is deterministic for a
/// given candidate order.
///
/// A tool with several stored photos is scored once per photo and may
/// occupy several result slots; no per-tool deduplication happens here.
///
/// An empty candidate set is not an error: the result is simply empty.
pub fn rank(
    query: Fingerprint,
    criteria: &SearchCriteria,
    candidates: &[Candidate],
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter_map(|cand| {
            let dist = distance(query, cand.fingerprint);

            let adjusted = match criteria.mode {
                SearchMode::Strict => {
                    if !matches(&cand.attributes, criteria) {
                        return None;
                    }
                    i64::from(dist)
                }
                SearchMode::Soft => i64::from(dist) - i64::from(bonus(&cand.attributes, criteria)),
            };

            Some(ScoredCandidate {
                tool_id: cand.tool_id,
                attributes: cand.attributes.clone(),
                hamming: dist,
                adjusted,
                image_ref: cand.image_ref.clone(),
            })
        })
        .collect();

    scored.sort_by_key(|s| (s.adjusted, s.hamming));
    scored.truncate(criteria.top_k);

    tracing::debug!(
        candidates = candidates.len(),
        hits = scored.len(),
        mode = ?criteria.mode,
        "ranked catalog against query fingerprint"
    );

    scored
}

/// Criteria-only search, the degenerate no-photo path: keep entries
/// passing [`matches`], in their input (recency) order, untruncated.
pub fn filter_entries<T>(
    entries: Vec<T>,
    criteria: &SearchCriteria,
    attrs: impl Fn(&T) -> &ToolAttributes,
) -> Vec<T> {
    entries
        .into_iter()
        .filter(|entry| matches(attrs(entry), criteria))
        .collect()
}
