use crate::cache::LookupCache;
use crate::constants::{DERIVED_COLUMN, DERIVED_SEPARATOR, INPUT_KEYS_COLUMN};
use crate::error::Result;
use crate::normalize::{normalize, split_keys};
use crate::table::Table;
use crate::types::{Key, RadiusLookup};
use crate::union::ordered_union;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Result of a complete enrichment pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResult {
    pub radius: u32,
    pub rows: usize,
    pub keys_resolved: usize,
    pub cache_hits: usize,
    pub remote_lookups: usize,
    pub flushes: usize,
    pub cache_file: String,
}

/// Fills the `radius_zips` column from the `total_zips` column of every row.
///
/// The cache for the radius is loaded once, consulted per key, and flushed
/// after every row that needed a remote lookup. A crash therefore loses at
/// most the lookups of the row in flight.
pub struct EnrichmentPipeline<'a> {
    lookup: &'a dyn RadiusLookup,
    cache_dir: PathBuf,
    radius: u32,
}

impl<'a> EnrichmentPipeline<'a> {
    pub fn new(lookup: &'a dyn RadiusLookup, cache_dir: impl Into<PathBuf>, radius: u32) -> Self {
        Self {
            lookup,
            cache_dir: cache_dir.into(),
            radius,
        }
    }

    pub fn run(&self, table: &mut Table) -> Result<PipelineResult> {
        self.run_with_progress(table, |_, _| {})
    }

    /// Run the pass, calling `progress(done, total)` after each row.
    #[instrument(skip_all, fields(radius = self.radius, table = %table.name()))]
    pub fn run_with_progress<P>(&self, table: &mut Table, mut progress: P) -> Result<PipelineResult>
    where
        P: FnMut(usize, usize),
    {
        let column = table.require_column(INPUT_KEYS_COLUMN)?;
        let mut cache = LookupCache::load(&self.cache_dir, self.radius)?;

        let total = table.len();
        let mut result = PipelineResult {
            radius: self.radius,
            rows: total,
            cache_file: cache.path().display().to_string(),
            ..Default::default()
        };
        info!("Enriching {} rows with radius {}", total, self.radius);

        let mut derived = Vec::with_capacity(total);
        for (index, field) in table.column_values(column).enumerate() {
            let keys: Vec<Key> = split_keys(field).map(normalize).collect();

            let mut per_key = Vec::with_capacity(keys.len());
            for key in &keys {
                let mut fetched = false;
                let found = cache.get_or_fetch(key, |key| {
                    fetched = true;
                    self.lookup.radius_zips(key, self.radius)
                });
                if fetched {
                    result.remote_lookups += 1;
                } else {
                    result.cache_hits += 1;
                }
                per_key.push(found);
            }
            result.keys_resolved += keys.len();

            if cache.flush_if_dirty()? {
                result.flushes += 1;
            }

            let merged = ordered_union(per_key);
            debug!(row = index, keys = keys.len(), merged = merged.len(), "Row enriched");
            derived.push(join_keys(&merged));
            progress(index + 1, total);
        }

        table.set_column(DERIVED_COLUMN, derived);
        info!(
            "Enrichment finished: {} keys, {} cache hits, {} remote lookups",
            result.keys_resolved, result.cache_hits, result.remote_lookups
        );
        Ok(result)
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter()
        .map(Key::as_str)
        .collect::<Vec<_>>()
        .join(DERIVED_SEPARATOR)
}
