use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::error::{DashboardError, DashboardResult};

use super::loader;
use super::model::Dataset;

/// Default lifetime of a cached dataset.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// DatasetSource – where a cache fill reads from
// ---------------------------------------------------------------------------

pub trait DatasetSource: Send + Sync {
    /// Read and normalize the whole dataset.
    fn read(&self) -> Result<Dataset>;

    /// Human-readable name used in logs and errors.
    fn describe(&self) -> String;
}

/// A spreadsheet (or csv/json/parquet file) on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    fn read(&self) -> Result<Dataset> {
        loader::load_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// DatasetCache – process-wide TTL cache with a single-flight fill
// ---------------------------------------------------------------------------

struct CachedDataset {
    value: Arc<Dataset>,
    loaded_at: Instant,
}

/// Holds the most recent dataset for `ttl`. The slot lock is held across the
/// source read, so concurrent misses wait for one fill instead of each
/// reading the source.
pub struct DatasetCache {
    source: Box<dyn DatasetSource>,
    ttl: Duration,
    slot: Mutex<Option<CachedDataset>>,
}

impl DatasetCache {
    pub fn new(source: impl DatasetSource + 'static, ttl: Duration) -> Self {
        DatasetCache {
            source: Box::new(source),
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Return the cached dataset, reading the source when the slot is empty
    /// or older than the TTL. A failed read caches nothing.
    pub fn load(&self) -> DashboardResult<Arc<Dataset>> {
        let mut slot = self.lock();

        if let Some(cached) = slot.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.value));
            }
            log::debug!("cached dataset from {} expired", self.source.describe());
            *slot = None;
        }

        let started = Instant::now();
        let dataset = self.source.read().map_err(|e| {
            let err = DashboardError::source_load(self.source.describe(), &e);
            log::error!("{err}");
            err
        })?;
        log::info!(
            "Loaded {} records from {} in {:?}",
            dataset.len(),
            self.source.describe(),
            started.elapsed()
        );

        let value = Arc::new(dataset);
        *slot = Some(CachedDataset {
            value: Arc::clone(&value),
            loaded_at: Instant::now(),
        });
        Ok(value)
    }

    /// Forget the cached value; the next `load` reads the source again.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Time left before the cached value expires. `None` when nothing is cached.
    pub fn expires_in(&self) -> Option<Duration> {
        self.lock()
            .as_ref()
            .map(|cached| self.ttl.saturating_sub(cached.loaded_at.elapsed()))
    }

    fn lock(&self) -> MutexGuard<'_, Option<CachedDataset>> {
        // A panic inside a fill leaves the slot untouched, so the data is still valid.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use anyhow::bail;

    use super::*;
    use crate::data::model::Record;

    /// Counts reads and sleeps a little so concurrent callers overlap.
    struct CountingSource {
        reads: Arc<AtomicUsize>,
        fail: bool,
    }

    impl DatasetSource for CountingSource {
        fn read(&self) -> Result<Dataset> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            if self.fail {
                bail!("source unavailable");
            }
            Ok(Dataset::from_records(vec![Record {
                id: format!("read-{n}"),
                ..Record::default()
            }]))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn cache(ttl: Duration, fail: bool) -> (DatasetCache, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            reads: Arc::clone(&reads),
            fail,
        };
        (DatasetCache::new(source, ttl), reads)
    }

    #[test]
    fn loads_within_ttl_share_one_read() {
        let (cache, reads) = cache(DEFAULT_TTL, false);
        let first = cache.load().unwrap();
        let second = cache.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(cache.expires_in().unwrap() <= DEFAULT_TTL);
    }

    #[test]
    fn concurrent_misses_trigger_a_single_read() {
        let (cache, reads) = cache(DEFAULT_TTL, false);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.load().unwrap())
            })
            .collect();
        let results: Vec<Arc<Dataset>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|ds| Arc::ptr_eq(ds, &results[0])));
    }

    #[test]
    fn expired_value_is_reloaded() {
        let (cache, reads) = cache(Duration::ZERO, false);
        let first = cache.load().unwrap();
        let second = cache.load().unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(first.records()[0].id, "read-0");
        assert_eq!(second.records()[0].id, "read-1");
    }

    #[test]
    fn invalidate_forces_a_new_read() {
        let (cache, reads) = cache(DEFAULT_TTL, false);
        cache.load().unwrap();
        cache.invalidate();
        assert!(cache.expires_in().is_none());
        cache.load().unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_read_is_a_source_load_error_and_caches_nothing() {
        let (cache, reads) = cache(DEFAULT_TTL, true);
        let err = cache.load().unwrap_err();

        assert!(matches!(err, DashboardError::SourceLoad { .. }));
        assert!(err.to_string().contains("source unavailable"));
        assert!(cache.expires_in().is_none());

        assert!(cache.load().is_err());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn file_source_describes_its_path() {
        let source = FileSource::new("data/avance.xlsx");
        assert_eq!(source.path(), Path::new("data/avance.xlsx"));
        assert!(source.describe().ends_with("avance.xlsx"));
    }
}
