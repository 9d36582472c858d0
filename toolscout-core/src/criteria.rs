//! Search criteria and the lenient boundary parsing that produces them.
//!
//! Criteria arrive from HTML forms as untyped strings. Numeric fields
//! that fail to parse are treated as unspecified rather than rejected,
//! and top-K is clamped into its valid range; by the time a
//! [`SearchCriteria`] exists, every field is well-typed and the rest of
//! the core never sees raw input.

use serde::{Deserialize, Serialize};

/// Smallest accepted top-K.
pub const TOP_K_MIN: usize = 1;
/// Largest accepted top-K.
pub const TOP_K_MAX: usize = 20;
/// Top-K used when the requested value is absent or unparseable.
pub const TOP_K_DEFAULT: usize = 5;

/// How criteria combine with visual similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Criteria are a conjunctive hard filter: any unmet criterion
    /// excludes the candidate outright.
    #[default]
    Strict,
    /// Criteria are a preference signal: each satisfied criterion earns
    /// a rank bonus, nothing is excluded.
    Soft,
}

/// One search request's criteria. Request-scoped, never persisted.
///
/// Empty strings mean "unspecified" for the text criteria; `None` means
/// the same for the numeric bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Case-insensitive substring match on the tool name.
    pub keyword: String,
    /// Exact match on storage location.
    pub location: String,
    /// Exact match on tool status.
    pub status: String,
    /// Exact match on the major category level.
    pub cat_l: String,
    /// Exact match on the mid category level.
    pub cat_m: String,
    /// Exact match on the minor category level.
    pub cat_s: String,
    /// Inclusive lower bound on quantity.
    pub min_qty: Option<u32>,
    /// Inclusive upper bound on purchase amount.
    pub max_amount: Option<u64>,
    pub mode: SearchMode,
    /// Result cap for ranked search, always within `[TOP_K_MIN, TOP_K_MAX]`.
    pub top_k: usize,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            location: String::new(),
            status: String::new(),
            cat_l: String::new(),
            cat_m: String::new(),
            cat_s: String::new(),
            min_qty: None,
            max_amount: None,
            mode: SearchMode::Strict,
            top_k: TOP_K_DEFAULT,
        }
    }
}

/// Criteria fields exactly as they arrive from a form, before any
/// parsing. `None` and empty strings are equivalent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCriteria<'a> {
    pub keyword: Option<&'a str>,
    pub location: Option<&'a str>,
    pub status: Option<&'a str>,
    pub cat_l: Option<&'a str>,
    pub cat_m: Option<&'a str>,
    pub cat_s: Option<&'a str>,
    pub min_qty: Option<&'a str>,
    pub max_amount: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub top_k: Option<&'a str>,
}

impl SearchCriteria {
    /// Build typed criteria from raw form fields.
    ///
    /// Leniency contract: unparseable numeric bounds become
    /// unspecified, an unparseable top-K falls back to
    /// [`TOP_K_DEFAULT`], an out-of-range top-K is clamped, and an
    /// unknown mode string means strict. None of these raise.
    pub fn from_raw(raw: RawCriteria<'_>) -> Self {
        Self {
            keyword: trimmed(raw.keyword),
            location: trimmed(raw.location),
            status: trimmed(raw.status),
            cat_l: trimmed(raw.cat_l),
            cat_m: trimmed(raw.cat_m),
            cat_s: trimmed(raw.cat_s),
            min_qty: lenient_number(raw.min_qty),
            max_amount: lenient_number(raw.max_amount),
            mode: parse_mode(raw.mode),
            top_k: clamp_top_k(raw.top_k),
        }
    }

    /// True when no criterion is specified at all.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty()
            && self.location.is_empty()
            && self.status.is_empty()
            && self.cat_l.is_empty()
            && self.cat_m.is_empty()
            && self.cat_s.is_empty()
            && self.min_qty.is_none()
            && self.max_amount.is_none()
    }
}

fn trimmed(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

fn lenient_number<N: std::str::FromStr>(raw: Option<&str>) -> Option<N> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn parse_mode(raw: Option<&str>) -> SearchMode {
    match raw.map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("soft") => SearchMode::Soft,
        _ => SearchMode::Strict,
    }
}

fn clamp_top_k(raw: Option<&str>) -> usize {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .map(|k| k.clamp(TOP_K_MIN as i64, TOP_K_MAX as i64) as usize)
        .unwrap_or(TOP_K_DEFAULT)
}
