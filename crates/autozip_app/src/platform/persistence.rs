use std::path::Path;

use autozip_core::{CacheEntry, CacheKey, CachedValue, PathCache, CACHE_TTL_MS};
use autozip_engine::{read_optional, AtomicFileWriter};
use autozip_logging::{autozip_error, autozip_info, autozip_warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum PersistedKey {
    LastFolder,
    LastManual,
    FullPath(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PersistedEntry {
    key: PersistedKey,
    value: String,
    cached_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedCache {
    entries: Vec<PersistedEntry>,
}

/// Loads the path cache, falling back to an empty one on any problem.
///
/// Expired entries are kept here; the resolver purges them on first use.
pub(crate) fn load_path_cache(path: &Path) -> PathCache {
    let content = match read_optional(path) {
        Ok(Some(text)) => text,
        Ok(None) => return PathCache::new(),
        Err(err) => {
            autozip_warn!("Failed to read path cache from {:?}: {}", path, err);
            return PathCache::new();
        }
    };

    let persisted: PersistedCache = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            autozip_warn!("Failed to parse path cache from {:?}: {}", path, err);
            return PathCache::new();
        }
    };

    let cache = PathCache::from_entries(
        CACHE_TTL_MS,
        persisted.entries.into_iter().map(|entry| CachedValue {
            key: match entry.key {
                PersistedKey::LastFolder => CacheKey::LastFolder,
                PersistedKey::LastManual => CacheKey::LastManual,
                PersistedKey::FullPath(folder) => CacheKey::FullPath(folder),
            },
            entry: CacheEntry::new(entry.value, entry.cached_at_ms),
        }),
    );
    autozip_info!("Loaded {} cached path entries from {:?}", cache.len(), path);
    cache
}

pub(crate) fn save_path_cache(path: &Path, cache: &PathCache) {
    let persisted = PersistedCache {
        entries: cache
            .entries()
            .into_iter()
            .map(|CachedValue { key, entry }| PersistedEntry {
                key: match key {
                    CacheKey::LastFolder => PersistedKey::LastFolder,
                    CacheKey::LastManual => PersistedKey::LastManual,
                    CacheKey::FullPath(folder) => PersistedKey::FullPath(folder),
                },
                value: entry.value,
                cached_at_ms: entry.cached_at_ms,
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            autozip_error!("Failed to serialize path cache: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(path);
    if let Err(err) = writer.write(&content) {
        autozip_error!("Failed to write path cache to {:?}: {}", writer.target(), err);
    }
}
