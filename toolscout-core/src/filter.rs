//! Strict filtering and soft bonus scoring of catalog entries.
//!
//! The same criteria drive two policies. [`matches`] treats them as a
//! conjunctive hard filter (strict mode): any specified criterion that
//! fails excludes the entry. [`bonus`] treats them as a preference
//! signal (soft mode): each satisfied criterion earns a non-negative
//! reward that the ranker subtracts from the visual distance.

use serde::{Deserialize, Serialize};

use crate::criteria::SearchCriteria;

/// Weight earned per satisfied text criterion (keyword, location,
/// status, each category level).
const TEXT_BONUS: u32 = 2;
/// Weight earned per satisfied numeric bound (min quantity, max amount).
const BOUND_BONUS: u32 = 1;

/// The attribute tuple of one catalog entry, as read by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAttributes {
    pub name: String,
    /// Free text; not inspected by any criterion.
    pub purpose: String,
    pub location: String,
    pub status: String,
    pub cat_l: String,
    pub cat_m: String,
    pub cat_s: String,
    pub qty: u32,
    pub purchase_amount: u64,
}

/// Strict-mode predicate: false as soon as any specified criterion
/// fails. Vacuously true when nothing is specified.
pub fn matches(attrs: &ToolAttributes, criteria: &SearchCriteria) -> bool {
    if !criteria.keyword.is_empty() && !contains_ci(&attrs.name, &criteria.keyword) {
        return false;
    }
    if !criteria.location.is_empty() && attrs.location != criteria.location {
        return false;
    }
    if !criteria.status.is_empty() && attrs.status != criteria.status {
        return false;
    }
    if !criteria.cat_l.is_empty() && attrs.cat_l != criteria.cat_l {
        return false;
    }
    if !criteria.cat_m.is_empty() && attrs.cat_m != criteria.cat_m {
        return false;
    }
    if !criteria.cat_s.is_empty() && attrs.cat_s != criteria.cat_s {
        return false;
    }
    if let Some(min) = criteria.min_qty {
        if attrs.qty < min {
            return false;
        }
    }
    if let Some(max) = criteria.max_amount {
        if attrs.purchase_amount > max {
            return false;
        }
    }
    true
}

/// Soft-mode reward: the accumulated weight of every satisfied
/// criterion. Unspecified criteria contribute nothing; there is no cap.
pub fn bonus(attrs: &ToolAttributes, criteria: &SearchCriteria) -> u32 {
    let mut bonus = 0;

    if !criteria.keyword.is_empty() && contains_ci(&attrs.name, &criteria.keyword) {
        bonus += TEXT_BONUS;
    }
    if !criteria.location.is_empty() && attrs.location == criteria.location {
        bonus += TEXT_BONUS;
    }
    if !criteria.status.is_empty() && attrs.status == criteria.status {
        bonus += TEXT_BONUS;
    }
    if !criteria.cat_l.is_empty() && attrs.cat_l == criteria.cat_l {
        bonus += TEXT_BONUS;
    }
    if !criteria.cat_m.is_empty() && attrs.cat_m == criteria.cat_m {
        bonus += TEXT_BONUS;
    }
    if !criteria.cat_s.is_empty() && attrs.cat_s == criteria.cat_s {
        bonus += TEXT_BONUS;
    }
    if let Some(min) = criteria.min_qty {
        if attrs.qty >= min {
            bonus += BOUND_BONUS;
        }
    }
    if let Some(max) = criteria.max_amount {
        if attrs.purchase_amount <= max {
            bonus += BOUND_BONUS;
        }
    }

    bonus
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::RawCriteria;

    fn clamp_meter() -> ToolAttributes {
        ToolAttributes {
            name: "클램프미터 Fluke 325".to_string(),
            purpose: "전류 측정".to_string(),
            location: "전기실".to_string(),
            status: "정상".to_string(),
            cat_l: "전기".to_string(),
            cat_m: "측정/시험".to_string(),
            cat_s: "클램프미터".to_string(),
            qty: 2,
            purchase_amount: 180_000,
        }
    }

    fn criteria(raw: RawCriteria<'_>) -> SearchCriteria {
        SearchCriteria::from_raw(raw)
    }

    #[test]
    fn test_matches_vacuously_true() {
        assert!(matches(&clamp_meter(), &SearchCriteria::default()));
    }

    #[test]
    fn test_keyword_substring_case_insensitive() {
        let c = criteria(RawCriteria { keyword: Some("fluke"), ..Default::default() });
        assert!(matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { keyword: Some("클램프"), ..Default::default() });
        assert!(matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { keyword: Some("해머"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));
    }

    #[test]
    fn test_exact_match_fields() {
        let c = criteria(RawCriteria { location: Some("전기실"), ..Default::default() });
        assert!(matches(&clamp_meter(), &c));

        // Substring is not enough for exact-match criteria.
        let c = criteria(RawCriteria { location: Some("전기"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { status: Some("폐기"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria {
            cat_l: Some("전기"),
            cat_m: Some("측정/시험"),
            cat_s: Some("클램프미터"),
            ..Default::default()
        });
        assert!(matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { cat_m: Some("배선/단자"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let c = criteria(RawCriteria { min_qty: Some("2"), ..Default::default() });
        assert!(matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { min_qty: Some("3"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { max_amount: Some("180000"), ..Default::default() });
        assert!(matches(&clamp_meter(), &c));

        let c = criteria(RawCriteria { max_amount: Some("179999"), ..Default::default() });
        assert!(!matches(&clamp_meter(), &c));
    }

    #[test]
    fn test_any_failing_criterion_excludes() {
        // Everything matches except status.
        let c = criteria(RawCriteria {
            keyword: Some("클램프"),
            location: Some("전기실"),
            status: Some("분실"),
            ..Default::default()
        });
        assert!(!matches(&clamp_meter(), &c));
    }

    #[test]
    fn test_bonus_weights() {
        // Six text criteria satisfied at weight 2, two bounds at weight 1.
        let c = criteria(RawCriteria {
            keyword: Some("클램프"),
            location: Some("전기실"),
            status: Some("정상"),
            cat_l: Some("전기"),
            cat_m: Some("측정/시험"),
            cat_s: Some("클램프미터"),
            min_qty: Some("1"),
            max_amount: Some("200000"),
            ..Default::default()
        });
        assert_eq!(bonus(&clamp_meter(), &c), 6 * TEXT_BONUS + 2 * BOUND_BONUS);
    }

    #[test]
    fn test_bonus_unsatisfied_and_unspecified_contribute_zero() {
        assert_eq!(bonus(&clamp_meter(), &SearchCriteria::default()), 0);

        // Specified but unmet: no reward, no exclusion here.
        let c = criteria(RawCriteria {
            location: Some("기계실"),
            min_qty: Some("10"),
            ..Default::default()
        });
        assert_eq!(bonus(&clamp_meter(), &c), 0);
    }

    #[test]
    fn test_bonus_partial() {
        let c = criteria(RawCriteria {
            location: Some("전기실"),
            status: Some("분실"),
            min_qty: Some("1"),
            ..Default::default()
        });
        assert_eq!(bonus(&clamp_meter(), &c), TEXT_BONUS + BOUND_BONUS);
    }
}
