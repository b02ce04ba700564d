//! Cross-convention fuzzy property discovery.
//!
//! The mapper compares property names across conventions: every convention
//! claiming a name contributes its canonical form, and the best similarity
//! over all form pairs wins. Discovery keeps the single best source per
//! destination property and accepts it only above the confidence threshold.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use granite_model::RECORD_TYPE;

use super::{ConventionRegistry, NamingConvention};
use crate::similarity::{edit_similarity, phonetic_eq};

/// Default acceptance threshold for discovered matches.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// One discovered source-property match for a destination property.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredMatch {
    /// Source property name that best matched.
    pub source: String,
    /// Confidence of the match, in `[0, 1]`.
    pub confidence: f64,
}

/// Result set of one discovery run: destination property name to match.
pub type DiscoveredMappings = BTreeMap<String, DiscoveredMatch>;

/// Fuzzy property matcher over a convention registry.
pub struct ConventionMapper {
    registry: ConventionRegistry,
    threshold: f64,
    memo: RefCell<BTreeMap<(String, String), Arc<DiscoveredMappings>>>,
}

impl Default for ConventionMapper {
    fn default() -> Self {
        Self::new(ConventionRegistry::default())
    }
}

impl ConventionMapper {
    #[must_use]
    pub fn new(registry: ConventionRegistry) -> Self {
        Self {
            registry,
            threshold: DEFAULT_THRESHOLD,
            memo: RefCell::new(BTreeMap::new()),
        }
    }

    /// Sets the acceptance threshold. Matches below it are dropped.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
        self.memo.borrow_mut().clear();
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Appends a convention to the active set.
    pub fn register_convention(&mut self, convention: impl NamingConvention + 'static) {
        self.registry.register(convention);
        self.memo.borrow_mut().clear();
    }

    /// Discovers the best source match per destination property.
    ///
    /// Results are memoized per `(source_type, dest_type)` pair, except when
    /// either side is the generic-record sentinel: direct callers pass
    /// varying record key sets, so this layer stays shape-accurate. The
    /// configuration builder above it still caches its resolved result per
    /// pair, record sources included.
    pub fn discover(
        &self,
        source_type: &str,
        source_props: &[String],
        dest_type: &str,
        dest_props: &[String],
    ) -> Arc<DiscoveredMappings> {
        let memoizable = source_type != RECORD_TYPE && dest_type != RECORD_TYPE;
        if memoizable {
            let key = (source_type.to_string(), dest_type.to_string());
            if let Some(found) = self.memo.borrow().get(&key) {
                return Arc::clone(found);
            }
        }

        let mut mappings = DiscoveredMappings::new();
        for dest in dest_props {
            let mut best: Option<DiscoveredMatch> = None;
            for source in source_props {
                let confidence = self.pair_confidence(source, dest);
                if best.as_ref().is_none_or(|b| confidence > b.confidence) {
                    best = Some(DiscoveredMatch {
                        source: source.clone(),
                        confidence,
                    });
                }
            }
            if let Some(found) = best
                && found.confidence >= self.threshold
            {
                tracing::debug!(
                    dest = dest.as_str(),
                    source = found.source.as_str(),
                    confidence = found.confidence,
                    "discovered convention match"
                );
                mappings.insert(dest.clone(), found);
            }
        }

        let mappings = Arc::new(mappings);
        if memoizable {
            self.memo.borrow_mut().insert(
                (source_type.to_string(), dest_type.to_string()),
                Arc::clone(&mappings),
            );
        }
        mappings
    }

    /// Cross-convention confidence for one name pair.
    ///
    /// For every convention matching `a` and every convention matching `b`,
    /// both names are normalized under the respective convention and the
    /// canonical forms compared: equal is 1.0, equal ignoring case is 0.95,
    /// otherwise Levenshtein similarity raised to at least 0.7 when the
    /// Soundex codes agree. The maximum over all combinations wins. A name
    /// matching no convention contributes its raw lowercase form.
    #[must_use]
    pub fn pair_confidence(&self, a: &str, b: &str) -> f64 {
        let forms_a = self.canonical_forms(a);
        let forms_b = self.canonical_forms(b);
        let mut best = 0.0_f64;
        for fa in &forms_a {
            for fb in &forms_b {
                let score = form_similarity(fa, fb);
                if score > best {
                    best = score;
                }
            }
        }
        best.clamp(0.0, 1.0)
    }

    /// Detects the dominant convention of a property-name set: the
    /// convention matching the most names, first registered wins ties,
    /// `None` when nothing matches anything.
    #[must_use]
    pub fn detect<'a>(&'a self, props: &[String]) -> Option<&'a Arc<dyn NamingConvention>> {
        let mut best: Option<(&Arc<dyn NamingConvention>, usize)> = None;
        for convention in self.registry.iter() {
            let count = props.iter().filter(|p| convention.matches(p)).count();
            if count > 0 && best.is_none_or(|(_, c)| count > c) {
                best = Some((convention, count));
            }
        }
        best.map(|(convention, _)| convention)
    }

    fn canonical_forms(&self, name: &str) -> Vec<String> {
        let forms: Vec<String> = self
            .registry
            .matching(name)
            .map(|c| c.normalize(name))
            .collect();
        if forms.is_empty() {
            vec![name.to_lowercase()]
        } else {
            forms
        }
    }
}

fn form_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.eq_ignore_ascii_case(b) {
        return 0.95;
    }
    let mut score = edit_similarity(a, b);
    if score < 0.7 && phonetic_eq(a, b) {
        score = 0.7;
    }
    score
}
