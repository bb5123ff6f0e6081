use crate::constants::cache_file_name;
use crate::error::{EnrichError, Result};
use crate::persist::write_atomic;
use crate::types::{Key, LookupResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Persistent `Key -> LookupResult` mapping for a single radius.
///
/// The whole mapping lives in memory. Snapshots are written to a sibling temp
/// file, synced and renamed over `cache<R>.json`, so a reader only ever sees
/// the previous or the new snapshot, never a partial one.
#[derive(Debug)]
pub struct LookupCache {
    path: PathBuf,
    radius: u32,
    entries: BTreeMap<Key, LookupResult>,
    dirty: bool,
}

impl LookupCache {
    /// Path of the snapshot for `radius` under `dir`.
    pub fn path_for(dir: &Path, radius: u32) -> PathBuf {
        dir.join(cache_file_name(radius))
    }

    /// Load the snapshot for `radius`, creating an empty one first if none exists.
    pub fn load(dir: &Path, radius: u32) -> Result<Self> {
        let path = Self::path_for(dir, radius);
        if !path.exists() {
            info!("No cache for radius {}, creating {}", radius, path.display());
            fs::create_dir_all(dir)?;
            write_snapshot(&path, &BTreeMap::new())?;
        }

        let reader = BufReader::new(File::open(&path)?);
        let entries: BTreeMap<Key, LookupResult> =
            serde_json::from_reader(reader).map_err(|source| EnrichError::CorruptCache {
                path: path.clone(),
                source,
            })?;
        info!("Loaded {} cached keys from {}", entries.len(), path.display());

        Ok(Self {
            path,
            radius,
            entries,
            dirty: false,
        })
    }

    /// Return the cached result for `key`, fetching and caching it on a miss.
    ///
    /// Whatever `fetch` returns is cached, including an empty result.
    pub fn get_or_fetch<F>(&mut self, key: &Key, fetch: F) -> LookupResult
    where
        F: FnOnce(&Key) -> LookupResult,
    {
        if let Some(cached) = self.entries.get(key) {
            crate::metrics::cache::hit();
            return cached.clone();
        }

        let fetched = fetch(key);
        debug!("Caching {} keys for {}", fetched.len(), key);
        self.entries.insert(key.clone(), fetched.clone());
        self.dirty = true;
        fetched
    }

    /// Replace the on-disk snapshot if anything changed since the last flush.
    /// Returns whether a write happened.
    pub fn flush_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        write_snapshot(&self.path, &self.entries)?;
        self.dirty = false;
        crate::metrics::cache::flushed();
        debug!("Flushed {} keys to {}", self.entries.len(), self.path.display());
        Ok(true)
    }

    pub fn get(&self, key: &Key) -> Option<&[Key]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }
}

fn write_snapshot(path: &Path, entries: &BTreeMap<Key, LookupResult>) -> Result<()> {
    write_atomic(path, |writer| {
        serde_json::to_writer(writer, entries)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use tempfile::tempdir;

    fn keys(raw: &[&str]) -> LookupResult {
        raw.iter().map(normalize).collect()
    }

    #[test]
    fn test_load_creates_empty_snapshot() {
        let dir = tempdir().unwrap();
        let cache = LookupCache::load(dir.path(), 10).unwrap();

        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
        assert_eq!(cache.path(), dir.path().join("cache10.json"));
        assert_eq!(fs::read_to_string(cache.path()).unwrap(), "{}");
    }

    #[test]
    fn test_load_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("radius");
        let cache = LookupCache::load(&nested, 5).unwrap();
        assert!(cache.path().exists());
    }

    #[test]
    fn test_hit_does_not_fetch() {
        let dir = tempdir().unwrap();
        let mut cache = LookupCache::load(dir.path(), 10).unwrap();
        let key = normalize("98101");

        let first = cache.get_or_fetch(&key, |_| keys(&["98101", "98102"]));
        assert!(cache.is_dirty());
        cache.flush_if_dirty().unwrap();

        let second = cache.get_or_fetch(&key, |_| panic!("cached key must not be fetched"));
        assert_eq!(first, second);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_empty_result_is_cached() {
        let dir = tempdir().unwrap();
        let mut cache = LookupCache::load(dir.path(), 10).unwrap();
        let key = normalize("00501");

        assert!(cache.get_or_fetch(&key, |_| Vec::new()).is_empty());
        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key), Some(&[] as &[Key]));
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let dir = tempdir().unwrap();
        let mut cache = LookupCache::load(dir.path(), 10).unwrap();
        assert!(!cache.flush_if_dirty().unwrap());

        cache.get_or_fetch(&normalize("98101"), |_| keys(&["98101"]));
        assert!(cache.flush_if_dirty().unwrap());
        assert!(!cache.flush_if_dirty().unwrap());
    }

    #[test]
    fn test_flush_round_trips_through_reload() {
        let dir = tempdir().unwrap();
        let mut cache = LookupCache::load(dir.path(), 25).unwrap();
        cache.get_or_fetch(&normalize("98101"), |_| keys(&["98101", "98104"]));
        cache.get_or_fetch(&normalize("98102"), |_| Vec::new());
        cache.flush_if_dirty().unwrap();

        let reloaded = LookupCache::load(dir.path(), 25).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(&normalize("98101")),
            Some(&keys(&["98101", "98104"])[..])
        );
        assert!(!dir.path().join("cache25.json.tmp").exists());
    }

    #[test]
    fn test_flush_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = LookupCache::path_for(dir.path(), 10);
        fs::write(&path, r#"{"98101":["98101","98102","98103","98104","98105"]}"#).unwrap();

        let mut cache = LookupCache::load(dir.path(), 10).unwrap();
        cache.get_or_fetch(&normalize("1"), |_| Vec::new());
        cache.flush_if_dirty().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["00001"], Vec::<String>::new());
    }

    #[test]
    fn test_radius_namespaces_are_independent() {
        let dir = tempdir().unwrap();
        let mut ten = LookupCache::load(dir.path(), 10).unwrap();
        ten.get_or_fetch(&normalize("98101"), |_| keys(&["98101"]));
        ten.flush_if_dirty().unwrap();

        let twenty = LookupCache::load(dir.path(), 20).unwrap();
        assert!(twenty.is_empty());
        assert_eq!(twenty.radius(), 20);
    }

    #[test]
    fn test_corrupt_snapshot_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(LookupCache::path_for(dir.path(), 10), "{not json").unwrap();

        let err = LookupCache::load(dir.path(), 10).unwrap_err();
        assert!(matches!(err, EnrichError::CorruptCache { .. }));
    }
}
