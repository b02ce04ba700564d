//! The four core word-case conventions.

use super::{NamingConvention, capitalize, split_name};

fn all_alnum(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `camelCase` names: lowercase head, capitalized humps, no separators.
pub struct CamelCase;

impl NamingConvention for CamelCase {
    fn name(&self) -> &'static str {
        "camel_case"
    }

    fn matches(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) && all_alnum(name)
    }

    fn normalize(&self, name: &str) -> String {
        split_name(name).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        let mut words = canonical.split_whitespace();
        let mut out = String::new();
        if let Some(first) = words.next() {
            out.push_str(&first.to_lowercase());
        }
        for word in words {
            out.push_str(&capitalize(word));
        }
        out
    }
}

/// `PascalCase` names: every word capitalized, no separators.
pub struct PascalCase;

impl NamingConvention for PascalCase {
    fn name(&self) -> &'static str {
        "pascal_case"
    }

    fn matches(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && all_alnum(name)
    }

    fn normalize(&self, name: &str) -> String {
        split_name(name).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        canonical.split_whitespace().map(capitalize).collect()
    }
}

/// `snake_case` names: lowercase words joined by underscores.
pub struct SnakeCase;

impl NamingConvention for SnakeCase {
    fn name(&self) -> &'static str {
        "snake_case"
    }

    fn matches(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            && !name.ends_with('_')
            && !name.contains("__")
    }

    fn normalize(&self, name: &str) -> String {
        split_name(name).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        canonical.split_whitespace().collect::<Vec<_>>().join("_")
    }
}

/// `kebab-case` names: lowercase words joined by hyphens.
pub struct KebabCase;

impl NamingConvention for KebabCase {
    fn name(&self) -> &'static str {
        "kebab_case"
    }

    fn matches(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !name.ends_with('-')
            && !name.contains("--")
    }

    fn normalize(&self, name: &str) -> String {
        split_name(name).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        canonical.split_whitespace().collect::<Vec<_>>().join("-")
    }
}
