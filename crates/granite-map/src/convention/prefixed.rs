//! Prefix-driven conventions: member prefixes and Hungarian type tags.

use super::{NamingConvention, capitalize, split_name};

/// Names carrying a member prefix such as `m_name` or `_name`.
///
/// The prefix list is configurable; the first entry is used when
/// denormalizing. Longest matching prefix wins when stripping.
pub struct PrefixConvention {
    prefixes: Vec<String>,
}

impl Default for PrefixConvention {
    fn default() -> Self {
        Self::new(["m_", "_", "s_"])
    }
}

impl PrefixConvention {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    fn strip<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .filter(|p| name.len() > p.len() && name.starts_with(p.as_str()))
            .max_by_key(|p| p.len())
            .map(|p| &name[p.len()..])
    }
}

impl NamingConvention for PrefixConvention {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn matches(&self, name: &str) -> bool {
        self.strip(name).is_some()
    }

    fn normalize(&self, name: &str) -> String {
        let body = self.strip(name).unwrap_or(name);
        split_name(body).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        let prefix = self.prefixes.first().map_or("", String::as_str);
        let mut words = canonical.split_whitespace();
        let mut out = String::from(prefix);
        if let Some(first) = words.next() {
            out.push_str(&first.to_lowercase());
        }
        for word in words {
            out.push_str(&capitalize(word));
        }
        out
    }
}

/// Hungarian-notation names: a type tag followed by a PascalCase body,
/// e.g. `strName`, `nCount`, `arrItems`.
pub struct HungarianConvention;

/// Recognized type tags, checked longest-first.
const TYPE_TAGS: &[&str] = &[
    "str", "arr", "obj", "int", "flt", "bln", "lp", "sz", "n", "b", "f",
];

impl HungarianConvention {
    fn strip(name: &str) -> Option<&str> {
        let mut tags: Vec<&str> = TYPE_TAGS.to_vec();
        tags.sort_by_key(|t| std::cmp::Reverse(t.len()));
        for tag in tags {
            if name.len() > tag.len()
                && name.starts_with(tag)
                && name[tag.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_uppercase())
            {
                return Some(&name[tag.len()..]);
            }
        }
        None
    }
}

impl NamingConvention for HungarianConvention {
    fn name(&self) -> &'static str {
        "hungarian"
    }

    fn matches(&self, name: &str) -> bool {
        Self::strip(name).is_some()
    }

    fn normalize(&self, name: &str) -> String {
        let body = Self::strip(name).unwrap_or(name);
        split_name(body).join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        let body: String = canonical.split_whitespace().map(capitalize).collect();
        format!("str{body}")
    }
}
