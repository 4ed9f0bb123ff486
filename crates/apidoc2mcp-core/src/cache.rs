//! Content-addressed cache for normalized specs.
//!
//! Keys are the SHA-256 of the raw document's canonical JSON serialization
//! (serde_json object maps are BTreeMap-backed, so keys are already sorted);
//! values are the normalized specs that resulted from converting them. Entries
//! are written only after the structural validation gate passes, and a changed
//! document produces a different key, so entries never go stale. Writes go
//! through a temp file and rename so a concurrent invocation can never observe
//! a partial entry.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use log::{debug, warn};
use serde_json::Value as JsonValue;
use sha2::Digest as _;
use tokio::fs;

/// On-disk cache of conversion results, one `{hex}.json` file per entry.
#[derive(Debug, Clone)]
pub struct ConversionCache {
    dir: PathBuf,
}

impl ConversionCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the cache entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the cache key for a raw document.
    ///
    /// Deterministic for identical values; semantically equivalent documents
    /// serialized differently will miss (accepted limitation).
    pub fn key(document: &JsonValue) -> String {
        let canonical =
            serde_json::to_string(document).unwrap_or_else(|_| document.to_string());
        hex::encode(sha2::Sha256::digest(canonical.as_bytes()))
    }

    /// Look up a previously converted spec.
    ///
    /// Unreadable or corrupt entries are treated as misses so the caller
    /// simply re-converts.
    pub async fn load(&self, key: &str) -> Option<JsonValue> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => return None,
        };
        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!("cache hit for {key}");
                Some(value)
            }
            Err(e) => {
                warn!("discarding corrupt cache entry {}: {e}", path.display());
                None
            }
        }
    }

    /// Persist a converted spec under `key`.
    ///
    /// Write-temp-then-rename keeps concurrent readers safe; last writer wins,
    /// which is acceptable since content is deterministic for identical input.
    pub async fn store(&self, key: &str, spec: &JsonValue) -> crate::Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let tmp_path = self
            .dir
            .join(format!("{key}.{}.tmp", std::process::id()));
        let content = serde_json::to_string_pretty(spec)?;
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, self.entry_path(key)).await?;
        debug!("cached conversion result under {key}");
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_key_is_deterministic() {
        let a = json!({"b": 1, "a": {"y": 2, "x": 3}});
        let b = json!({"a": {"x": 3, "y": 2}, "b": 1});
        // Key order in the literal does not matter: maps are sorted
        assert_eq!(ConversionCache::key(&a), ConversionCache::key(&b));
    }

    #[test]
    fn test_key_differs_for_different_documents() {
        let a = json!({"openapi": "3.0.0"});
        let b = json!({"openapi": "3.0.1"});
        assert_ne!(ConversionCache::key(&a), ConversionCache::key(&b));
    }

    #[tokio::test]
    async fn test_store_and_load_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let cache = ConversionCache::new(dir.path());
        let spec = json!({"openapi": "3.0.0", "info": {"title": "T", "version": "1"}, "paths": {}});
        let key = ConversionCache::key(&json!({"raw": true}));

        assert!(cache.load(&key).await.is_none());
        cache.store(&key, &spec).await?;
        assert_eq!(cache.load(&key).await, Some(spec));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() -> crate::Result<()> {
        let dir = tempdir()?;
        let cache = ConversionCache::new(dir.path());
        let key = ConversionCache::key(&json!({"raw": 1}));
        fs::create_dir_all(dir.path()).await?;
        fs::write(dir.path().join(format!("{key}.json")), "not json").await?;
        assert!(cache.load(&key).await.is_none());
        Ok(())
    }
}
