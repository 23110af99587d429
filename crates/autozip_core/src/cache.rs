use std::collections::BTreeMap;

use crate::{PathSource, ResolvedPath};

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// Entries older than this are expired (24 hours).
pub const CACHE_TTL_MS: Millis = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: String,
    pub cached_at_ms: Millis,
}

impl CacheEntry {
    pub fn new(value: impl Into<String>, cached_at_ms: Millis) -> Self {
        Self {
            value: value.into(),
            cached_at_ms,
        }
    }

    /// An entry is expired once its age strictly exceeds `ttl_ms`.
    pub fn is_expired(&self, now: Millis, ttl_ms: Millis) -> bool {
        now.saturating_sub(self.cached_at_ms) > ttl_ms
    }
}

/// Identifies one slot of the cache in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CacheKey {
    /// Last folder name returned by the native picker.
    LastFolder,
    /// Last manually entered path.
    LastManual,
    /// Absolute path mapped to a picker folder name.
    FullPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub key: CacheKey,
    pub entry: CacheEntry,
}

/// Recently used output paths, each with its own timestamp.
///
/// Holds at most one picker folder name and one manual path; the full-path
/// mappings are keyed by folder display name. Readers never return expired
/// entries; [`PathCache::purge_expired`] drops them for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCache {
    ttl_ms: Millis,
    folder: Option<CacheEntry>,
    manual: Option<CacheEntry>,
    full_paths: BTreeMap<String, CacheEntry>,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::with_ttl(CACHE_TTL_MS)
    }
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl_ms: Millis) -> Self {
        Self {
            ttl_ms,
            folder: None,
            manual: None,
            full_paths: BTreeMap::new(),
        }
    }

    /// Rebuilds a cache from a persisted snapshot. Later duplicates win.
    pub fn from_entries(ttl_ms: Millis, entries: impl IntoIterator<Item = CachedValue>) -> Self {
        let mut cache = Self::with_ttl(ttl_ms);
        for CachedValue { key, entry } in entries {
            match key {
                CacheKey::LastFolder => cache.folder = Some(entry),
                CacheKey::LastManual => cache.manual = Some(entry),
                CacheKey::FullPath(folder) => {
                    cache.full_paths.insert(folder, entry);
                }
            }
        }
        cache
    }

    pub fn ttl_ms(&self) -> Millis {
        self.ttl_ms
    }

    pub fn len(&self) -> usize {
        usize::from(self.folder.is_some()) + usize::from(self.manual.is_some()) + self.full_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored entry, expired ones included.
    pub fn entries(&self) -> Vec<CachedValue> {
        let mut out = Vec::with_capacity(self.len());
        if let Some(entry) = &self.folder {
            out.push(CachedValue {
                key: CacheKey::LastFolder,
                entry: entry.clone(),
            });
        }
        if let Some(entry) = &self.manual {
            out.push(CachedValue {
                key: CacheKey::LastManual,
                entry: entry.clone(),
            });
        }
        out.extend(self.full_paths.iter().map(|(folder, entry)| CachedValue {
            key: CacheKey::FullPath(folder.clone()),
            entry: entry.clone(),
        }));
        out
    }

    /// Scans every entry once and removes the expired ones.
    ///
    /// Returns how many entries were removed.
    pub fn purge_expired(&mut self, now: Millis) -> usize {
        let ttl = self.ttl_ms;
        let before = self.len();
        if self.folder.as_ref().is_some_and(|e| e.is_expired(now, ttl)) {
            self.folder = None;
        }
        if self.manual.as_ref().is_some_and(|e| e.is_expired(now, ttl)) {
            self.manual = None;
        }
        self.full_paths.retain(|_, entry| !entry.is_expired(now, ttl));
        before - self.len()
    }

    pub fn folder_name(&self, now: Millis) -> Option<&str> {
        self.fresh(self.folder.as_ref(), now)
    }

    pub fn manual_path(&self, now: Millis) -> Option<&str> {
        self.fresh(self.manual.as_ref(), now)
    }

    pub fn full_path(&self, folder_name: &str, now: Millis) -> Option<&str> {
        self.fresh(self.full_paths.get(folder_name), now)
    }

    /// Stored mapping for `folder_name` regardless of age.
    ///
    /// Only meant as a prompt default; never as a resolved path.
    pub fn full_path_any_age(&self, folder_name: &str) -> Option<&str> {
        self.full_paths.get(folder_name).map(|e| e.value.as_str())
    }

    pub fn remember_folder(&mut self, name: impl Into<String>, now: Millis) {
        self.folder = Some(CacheEntry::new(name, now));
    }

    pub fn remember_manual(&mut self, path: impl Into<String>, now: Millis) {
        self.manual = Some(CacheEntry::new(path, now));
    }

    pub fn remember_full_path(
        &mut self,
        folder_name: impl Into<String>,
        full_path: impl Into<String>,
        now: Millis,
    ) {
        self.full_paths
            .insert(folder_name.into(), CacheEntry::new(full_path, now));
    }

    /// The path to show on startup: the picker folder if still fresh,
    /// otherwise the manual path if still fresh.
    pub fn restore_last(&self, now: Millis) -> Option<ResolvedPath> {
        if let Some(name) = self.folder_name(now) {
            let full_path = self.full_path(name, now).map(ToOwned::to_owned);
            return Some(ResolvedPath {
                display_name: name.to_owned(),
                full_path,
                source: PathSource::Picker,
            });
        }
        self.manual_path(now).map(ResolvedPath::manual)
    }

    fn fresh<'a>(&self, entry: Option<&'a CacheEntry>, now: Millis) -> Option<&'a str> {
        entry
            .filter(|e| !e.is_expired(now, self.ttl_ms))
            .map(|e| e.value.as_str())
    }
}
