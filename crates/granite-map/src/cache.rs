//! Pluggable configuration caches.
//!
//! All caches are keyed by the `(source type, destination type)` pair and
//! store fully resolved configurations. Entries are idempotently
//! recomputable, so every durability decision here trades safety for
//! simplicity in favor of recomputing on loss.
//!
//! # Cache file format
//!
//! The persistent variant stores one JSON object at
//! `<dir>/granite_mapper_cache.json`, keyed by `"<source>-><destination>"`
//! strings mapping to per-property rule maps. Missing file means empty
//! cache; a non-object payload or a key without the separator drops that
//! content rather than failing.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use granite_model::Value;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::profile::PropertyRule;
use crate::transformer::{NamedRef, Transformer};

/// File name used by [`PersistentFileCache`] inside its directory.
pub const CACHE_FILE_NAME: &str = "granite_mapper_cache.json";

const PAIR_SEPARATOR: &str = "->";

/// A resolved configuration: destination property name to rule.
pub type Configuration = BTreeMap<String, PropertyRule>;

/// Identifies one mapping configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairKey {
    pub source_type: String,
    pub dest_type: String,
}

impl PairKey {
    #[must_use]
    pub fn new(source_type: impl Into<String>, dest_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            dest_type: dest_type.into(),
        }
    }

    /// Serialized form, `"source->dest"`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}{}{}", self.source_type, PAIR_SEPARATOR, self.dest_type)
    }

    /// Parses a serialized key; `None` when the separator is missing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (source, dest) = raw.split_once(PAIR_SEPARATOR)?;
        Some(Self::new(source, dest))
    }
}

/// Contract shared by every cache backing the configuration builder.
pub trait MappingCache {
    fn has(&self, key: &PairKey) -> bool;
    fn get(&self, key: &PairKey) -> Option<Arc<Configuration>>;
    fn put(&mut self, key: PairKey, config: Arc<Configuration>);
    fn clear(&mut self);
}

/// Cache scoped to one builder instance.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: BTreeMap<PairKey, Arc<Configuration>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MappingCache for InMemoryCache {
    fn has(&self, key: &PairKey) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &PairKey) -> Option<Arc<Configuration>> {
        self.entries.get(key).map(Arc::clone)
    }

    fn put(&mut self, key: PairKey, config: Arc<Configuration>) {
        self.entries.insert(key, config);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Hit/miss accounting for a [`SharedCache`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total: u64,
    pub hit_rate_percent: f64,
}

#[derive(Debug, Default)]
struct SharedInner {
    entries: BTreeMap<PairKey, Arc<Configuration>>,
    hits: u64,
    misses: u64,
}

/// Cloneable cache handle shared between builder instances.
///
/// Constructed and injected explicitly; cloning the handle shares the
/// underlying store. Lookups are counted for [`Self::stats`].
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<SharedInner>>,
}

impl SharedCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hit/miss accounting.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("shared cache poisoned");
        let total = inner.hits + inner.misses;
        let hit_rate_percent = if total == 0 {
            0.0
        } else {
            inner.hits as f64 / total as f64 * 100.0
        };
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            total,
            hit_rate_percent,
        }
    }
}

impl MappingCache for SharedCache {
    fn has(&self, key: &PairKey) -> bool {
        self.inner
            .lock()
            .expect("shared cache poisoned")
            .entries
            .contains_key(key)
    }

    fn get(&self, key: &PairKey) -> Option<Arc<Configuration>> {
        let mut inner = self.inner.lock().expect("shared cache poisoned");
        match inner.entries.get(key).map(Arc::clone) {
            Some(found) => {
                inner.hits += 1;
                Some(found)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    fn put(&mut self, key: PairKey, config: Arc<Configuration>) {
        self.inner
            .lock()
            .expect("shared cache poisoned")
            .entries
            .insert(key, config);
    }

    fn clear(&mut self) {
        self.inner
            .lock()
            .expect("shared cache poisoned")
            .entries
            .clear();
    }
}

/// Serializable projection of a [`PropertyRule`].
///
/// Conditions and closure/object transformers cannot round-trip through a
/// file; only named transformer references survive. Reloaded rules carry
/// the serializable fields and are otherwise recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transformer: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default)]
    has_default: bool,
    #[serde(default)]
    ignore: bool,
}

impl From<&PropertyRule> for PersistedRule {
    fn from(rule: &PropertyRule) -> Self {
        Self {
            source: rule.source.clone(),
            transformer: rule
                .transformer
                .as_ref()
                .and_then(Transformer::as_named)
                .cloned(),
            default: rule.default.clone(),
            has_default: rule.has_default,
            ignore: rule.ignore,
        }
    }
}

impl From<PersistedRule> for PropertyRule {
    fn from(persisted: PersistedRule) -> Self {
        Self {
            source: persisted.source,
            transformer: persisted.transformer.map(Transformer::Named),
            condition: None,
            default: persisted.default,
            has_default: persisted.has_default,
            ignore: persisted.ignore,
        }
    }
}

/// Durable cache backed by one JSON file.
///
/// `put` only marks the cache dirty; [`Self::save`] writes the whole map to
/// a temp file and atomically renames it over the target, so concurrent
/// readers never observe a torn file. Uncommitted entries are lost on crash
/// and recomputed later. Dropping the cache saves when dirty.
#[derive(Debug)]
pub struct PersistentFileCache {
    memory: InMemoryCache,
    path: PathBuf,
    dirty: bool,
}

impl PersistentFileCache {
    /// Opens the cache rooted at `dir`, loading any existing file.
    ///
    /// Loading is best-effort: a missing file, unreadable content, or a
    /// non-object payload all start empty rather than failing. Keys
    /// lacking the pair separator are dropped silently.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(CACHE_FILE_NAME);
        let memory = Self::load(&path);
        tracing::debug!(
            path = %path.display(),
            entries = memory.len(),
            "opened persistent mapping cache"
        );
        Self {
            memory,
            path,
            dirty: false,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether unpersisted entries exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn load(path: &Path) -> InMemoryCache {
        let mut memory = InMemoryCache::new();
        let Ok(contents) = fs::read_to_string(path) else {
            return memory;
        };
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&contents) else {
            tracing::warn!(path = %path.display(), "cache file is not an object; starting empty");
            return memory;
        };
        for (raw_key, raw_config) in map {
            let Some(key) = PairKey::parse(&raw_key) else {
                tracing::debug!(key = raw_key.as_str(), "dropping cache key without separator");
                continue;
            };
            let Ok(persisted) =
                serde_json::from_value::<BTreeMap<String, PersistedRule>>(raw_config)
            else {
                tracing::debug!(key = raw_key.as_str(), "dropping unreadable cache entry");
                continue;
            };
            let config: Configuration = persisted
                .into_iter()
                .map(|(prop, rule)| (prop, rule.into()))
                .collect();
            memory.put(key, Arc::new(config));
        }
        memory
    }

    /// Writes the whole map to disk through a uniquely named temp file in
    /// the same directory and an atomic rename, creating the parent
    /// directory if absent. Unique temp names keep concurrent writers from
    /// publishing each other's half-written files; the last rename wins.
    pub fn save(&mut self) -> Result<()> {
        let mut payload: BTreeMap<String, BTreeMap<String, PersistedRule>> = BTreeMap::new();
        for (key, config) in &self.memory.entries {
            let rules = config
                .iter()
                .map(|(prop, rule)| (prop.clone(), PersistedRule::from(rule)))
                .collect();
            payload.insert(key.cache_key(), rules);
        }
        let json = serde_json::to_string_pretty(&payload).context("serialize mapping cache")?;

        let parent = self
            .path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        fs::create_dir_all(&parent)
            .with_context(|| format!("create cache directory: {}", parent.display()))?;
        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("create cache temp file in {}", parent.display()))?;
        temp.write_all(json.as_bytes())
            .context("write cache temp file")?;
        temp.persist(&self.path)
            .with_context(|| format!("publish cache file: {}", self.path.display()))?;
        self.dirty = false;
        tracing::debug!(
            path = %self.path.display(),
            entries = self.memory.len(),
            "saved persistent mapping cache"
        );
        Ok(())
    }
}

impl MappingCache for PersistentFileCache {
    fn has(&self, key: &PairKey) -> bool {
        self.memory.has(key)
    }

    fn get(&self, key: &PairKey) -> Option<Arc<Configuration>> {
        self.memory.get(key)
    }

    fn put(&mut self, key: PairKey, config: Arc<Configuration>) {
        self.memory.put(key, config);
        self.dirty = true;
    }

    /// Clears and saves immediately, bypassing the dirty flag, so the wipe
    /// is durable right away.
    fn clear(&mut self) {
        self.memory.clear();
        if let Err(error) = self.save() {
            tracing::warn!(%error, "failed to persist cache clear");
        }
    }
}

impl Drop for PersistentFileCache {
    fn drop(&mut self) {
        if self.dirty
            && let Err(error) = self.save()
        {
            tracing::warn!(%error, "failed to flush mapping cache on drop");
        }
    }
}
