//! Abbreviation convention: names built from well-known short forms.

use std::collections::BTreeMap;

use super::{NamingConvention, capitalize, split_name};

/// Default abbreviation table, short form to full word.
const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("addr", "address"),
    ("cfg", "configuration"),
    ("cnt", "count"),
    ("desc", "description"),
    ("idx", "index"),
    ("img", "image"),
    ("msg", "message"),
    ("num", "number"),
    ("pwd", "password"),
    ("qty", "quantity"),
    ("tmp", "temporary"),
    ("usr", "user"),
];

/// Recognizes names containing known abbreviation tokens, e.g. `numItems`
/// or `usr_addr`. Normalizing expands the abbreviations; denormalizing
/// re-abbreviates and renders camel style.
pub struct AbbreviationConvention {
    expansions: BTreeMap<String, String>,
    contractions: BTreeMap<String, String>,
}

impl Default for AbbreviationConvention {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATIONS.iter().map(|&(a, f)| (a, f)))
    }
}

impl AbbreviationConvention {
    pub fn new<I, A, F>(table: I) -> Self
    where
        I: IntoIterator<Item = (A, F)>,
        A: Into<String>,
        F: Into<String>,
    {
        let mut expansions = BTreeMap::new();
        let mut contractions = BTreeMap::new();
        for (abbr, full) in table {
            let abbr = abbr.into();
            let full = full.into();
            contractions.insert(full.clone(), abbr.clone());
            expansions.insert(abbr, full);
        }
        Self {
            expansions,
            contractions,
        }
    }
}

impl NamingConvention for AbbreviationConvention {
    fn name(&self) -> &'static str {
        "abbreviation"
    }

    fn matches(&self, name: &str) -> bool {
        split_name(name)
            .iter()
            .any(|word| self.expansions.contains_key(word))
    }

    fn normalize(&self, name: &str) -> String {
        split_name(name)
            .iter()
            .map(|word| {
                self.expansions
                    .get(word)
                    .cloned()
                    .unwrap_or_else(|| word.clone())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn denormalize(&self, canonical: &str) -> String {
        let mut out = String::new();
        for (i, word) in canonical.split_whitespace().enumerate() {
            let word = self
                .contractions
                .get(word)
                .map_or(word, String::as_str);
            if i == 0 {
                out.push_str(&word.to_lowercase());
            } else {
                out.push_str(&capitalize(word));
            }
        }
        out
    }
}
