//! Fixed category taxonomy
//!
//! The three-level tree (major / middle / minor) clients use to
//! classify tools. It ships with the binary and never changes at
//! runtime; a parse failure of the embedded JSON is a build defect.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;

/// Embedded tree: major category -> middle category -> minor labels.
const CATEGORY_JSON: &str = include_str!("../config/categories.json");

static TREE: OnceLock<CategoryTree> = OnceLock::new();

/// Parsed category tree, ready to serialize back to clients.
pub struct CategoryTree {
    tree: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// The process-wide taxonomy, parsed once on first use.
pub fn category_tree() -> &'static CategoryTree {
    TREE.get_or_init(|| {
        let tree =
            serde_json::from_str(CATEGORY_JSON).expect("embedded category taxonomy is valid JSON");
        CategoryTree { tree }
    })
}

impl CategoryTree {
    /// The full tree as a JSON value for the categories endpoint.
    pub fn as_json(&self) -> Value {
        serde_json::to_value(&self.tree).unwrap_or(Value::Null)
    }

    /// Whether the (cat_l, cat_m, cat_s) triple names a known path.
    /// Empty levels are allowed; a non-empty level must exist under
    /// its parent.
    pub fn is_valid_path(&self, cat_l: &str, cat_m: &str, cat_s: &str) -> bool {
        if cat_l.is_empty() {
            return cat_m.is_empty() && cat_s.is_empty();
        }
        let Some(middles) = self.tree.get(cat_l) else {
            return false;
        };
        if cat_m.is_empty() {
            return cat_s.is_empty();
        }
        let Some(minors) = middles.get(cat_m) else {
            return false;
        };
        cat_s.is_empty() || minors.iter().any(|m| m == cat_s)
    }
}
