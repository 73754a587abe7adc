//! Keyword-based default categorization.
//!
//! A heuristic only: the caller's explicit category always wins. Keyword
//! sets are checked in a fixed priority order and the first hit decides.

use crate::task::Category;

// Substring matches against the lower-cased text, so "diseñ" covers both
// "diseño" and "diseñar".
const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Design, &["design", "diseñ", "figma", "ui", "ux"]),
    (Category::Development, &["dev", "cod", "react", "api", "bug"]),
    (Category::Review, &["revis", "check", "test"]),
];

/// Pick a default category for free text. Returns `General` when no keyword
/// set matches.
pub fn assign_category_by_keywords(text: &str) -> Category {
    let lower = text.to_lowercase();
    for (category, keywords) in KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *category;
        }
    }
    Category::General
}
