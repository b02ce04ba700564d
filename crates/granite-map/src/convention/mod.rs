//! Naming conventions and the registry holding the active set.
//!
//! A convention is a reversible naming transform: a membership test plus a
//! normalize/denormalize pair over the canonical form (lowercase,
//! space-separated words). Conventions are stateless and constructed once.

mod abbrev;
mod cases;
pub mod mapper;
mod prefixed;

use std::sync::Arc;

pub use abbrev::AbbreviationConvention;
pub use cases::{CamelCase, KebabCase, PascalCase, SnakeCase};
pub use prefixed::{HungarianConvention, PrefixConvention};

use crate::similarity::scored_similarity;

/// A reversible naming transform with a membership test.
pub trait NamingConvention: Send + Sync {
    /// Convention name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether `name` is written in this convention.
    fn matches(&self, name: &str) -> bool;

    /// Canonical form: lowercase, space-separated words.
    fn normalize(&self, name: &str) -> String;

    /// Renders a canonical form back into this convention.
    fn denormalize(&self, canonical: &str) -> String;

    /// Self-similarity of two names as seen by this convention.
    ///
    /// Identical names score 1.0. When both names belong to the convention,
    /// equal canonical forms score 0.9 and everything else falls back to
    /// edit-distance similarity with the semantic bonus (cutoff 0.7). When
    /// at least one name is foreign, equal canonical forms score 0.85 and
    /// the fallback cutoff drops to 0.5.
    fn match_confidence(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let canonical_a = self.normalize(a);
        let canonical_b = self.normalize(b);
        if self.matches(a) && self.matches(b) {
            if canonical_a == canonical_b {
                return 0.9;
            }
            scored_similarity(&canonical_a, &canonical_b, 0.7)
        } else {
            if canonical_a == canonical_b {
                return 0.85;
            }
            scored_similarity(&canonical_a, &canonical_b, 0.5)
        }
    }
}

/// Splits a raw name into lowercase words on separators and case boundaries.
///
/// Handles camel humps, ACRONYMWord boundaries, and `_`/`-`/`.`/space
/// separators.
pub(crate) fn split_name(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if (prev_lower || acronym_end) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Capitalizes the first letter of a word.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered set of active conventions. Iteration order is registration
/// order, which doubles as the tie-break everywhere conventions compete.
#[derive(Clone)]
pub struct ConventionRegistry {
    conventions: Vec<Arc<dyn NamingConvention>>,
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        let mut registry = Self {
            conventions: Vec::new(),
        };
        registry.register(CamelCase);
        registry.register(PascalCase);
        registry.register(SnakeCase);
        registry.register(KebabCase);
        registry.register(PrefixConvention::default());
        registry.register(HungarianConvention);
        registry.register(AbbreviationConvention::default());
        registry
    }
}

impl ConventionRegistry {
    /// An empty registry; use `Default` for the standard set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            conventions: Vec::new(),
        }
    }

    /// Appends a convention. Later registrations lose ties to earlier ones.
    pub fn register(&mut self, convention: impl NamingConvention + 'static) {
        self.conventions.push(Arc::new(convention));
    }

    /// Conventions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn NamingConvention>> {
        self.conventions.iter()
    }

    /// Conventions matching `name`, in registration order.
    pub fn matching<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn NamingConvention>> {
        self.conventions.iter().filter(move |c| c.matches(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_handles_boundaries() {
        assert_eq!(split_name("firstName"), vec!["first", "name"]);
        assert_eq!(split_name("first_name"), vec!["first", "name"]);
        assert_eq!(split_name("first-name"), vec!["first", "name"]);
        assert_eq!(split_name("HTMLParser"), vec!["html", "parser"]);
        assert_eq!(split_name("userID"), vec!["user", "id"]);
        assert!(split_name("").is_empty());
    }

    #[test]
    fn default_registry_has_seven_conventions() {
        let registry = ConventionRegistry::default();
        assert_eq!(registry.len(), 7);
        let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names[0], "camel_case");
        assert_eq!(names[1], "pascal_case");
    }

    #[test]
    fn identical_names_score_one() {
        let camel = CamelCase;
        assert_eq!(camel.match_confidence("firstName", "firstName"), 1.0);
    }

    #[test]
    fn both_matching_equal_canonical_scores_point_nine() {
        // Same canonical form via abbreviation expansion is impossible for
        // plain camel, so exercise the 0.9 tier through case variants.
        let snake = SnakeCase;
        assert_eq!(snake.match_confidence("first_name", "first_name"), 1.0);
        let camel = CamelCase;
        // "firstName" and "firstname" both match camel, different canonicals.
        let score = camel.match_confidence("firstName", "firstname");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn foreign_names_with_equal_canonical_score_point_eight_five() {
        let camel = CamelCase;
        // Snake-case input does not match camel but normalizes identically.
        assert_eq!(camel.match_confidence("first_name", "firstName"), 0.85);
    }

    #[test]
    fn unrelated_single_words_hit_floor() {
        let camel = CamelCase;
        assert_eq!(
            camel.match_confidence("xyz", "qrs"),
            crate::similarity::CONFIDENCE_FLOOR
        );
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        let camel = CamelCase;
        for (a, b) in [
            ("profileUrl", "avatarLink"),
            ("userId", "id"),
            ("email", "mail"),
            ("a", "b"),
        ] {
            let score = camel.match_confidence(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b}: {score}");
        }
    }
}
