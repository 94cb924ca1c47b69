use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ranking_dashboard::config::Config;
use ranking_dashboard::data::cache::{DatasetCache, FileSource};
use ranking_dashboard::data::filter::{FilterOptions, FilterSelection};
use ranking_dashboard::data::model::Dataset;
use ranking_dashboard::report::DashboardView;
use ranking_dashboard::report::export;

/// Longest wait before retrying a failed load.
const RETRY_BACKOFF: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    cache: DatasetCache,

    /// Dataset the current view was computed from (None until the first load).
    pub dataset: Option<Arc<Dataset>>,

    /// Dropdown contents for the current dataset.
    pub options: FilterOptions,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// KPIs and tables for `dataset` + `selection`.
    pub view: Option<DashboardView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set after a failed load; no read is attempted before this instant.
    retry_at: Option<Instant>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cache = DatasetCache::new(FileSource::new(&config.data), config.cache_ttl());
        let selection = FilterSelection {
            top_n: config.top_n(),
            ..FilterSelection::default()
        };
        Self {
            config,
            cache,
            dataset: None,
            options: FilterOptions::default(),
            selection,
            view: None,
            status_message: None,
            retry_at: None,
        }
    }

    /// Pull the dataset from the cache and recompute the view if it changed.
    /// Cheap when the cache is warm, so it runs every frame.
    pub fn refresh(&mut self) {
        if self.retry_at.is_some_and(|at| Instant::now() < at) {
            return;
        }
        match self.cache.load() {
            Ok(dataset) => {
                let unchanged = self
                    .dataset
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &dataset));
                self.retry_at = None;
                if !unchanged {
                    self.set_dataset(dataset);
                }
            }
            Err(e) => {
                // The last good view stays on screen until a retry succeeds.
                let backoff = self.config.cache_ttl().min(RETRY_BACKOFF);
                log::warn!("Retrying load in {backoff:?}");
                self.status_message = Some(format!("Error: {e}"));
                self.retry_at = Some(Instant::now() + backoff);
            }
        }
    }

    /// Ingest a newly loaded dataset, rebuild dropdowns and the view.
    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.options = FilterOptions::from_dataset(&dataset);
        self.selection = self.selection.clone().reconcile(&self.options);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Apply a new sidebar selection.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        let selection = selection.reconcile(&self.options);
        if selection != self.selection {
            self.selection = selection;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| DashboardView::compute(ds, &self.selection));
    }

    /// Drop the cached dataset and read the source again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.retry_at = None;
        self.refresh();
    }

    /// Switch to another source file.
    pub fn open_source(&mut self, path: PathBuf) {
        log::info!("Switching data source to {}", path.display());
        self.cache = DatasetCache::new(FileSource::new(&path), self.config.cache_ttl());
        self.config.data = path;
        self.dataset = None;
        self.view = None;
        self.retry_at = None;
        self.refresh();
    }

    pub fn source_name(&self) -> String {
        self.cache.source_name()
    }

    /// Time until the next read is due (cache expiry or load retry), for
    /// repaint scheduling.
    pub fn expires_in(&self) -> Option<Duration> {
        match self.retry_at {
            Some(at) => Some(at.saturating_duration_since(Instant::now())),
            None => self.cache.expires_in(),
        }
    }

    pub fn export_ranking(&mut self, path: &Path) {
        let Some(view) = &self.view else { return };
        self.status_message = export::write_ranking_csv(path, &view.ranking)
            .err()
            .map(|e| format!("Error: {e}"));
    }

    pub fn export_departments(&mut self, path: &Path) {
        let Some(view) = &self.view else { return };
        self.status_message = export::write_departments_csv(path, &view.departments)
            .err()
            .map(|e| format!("Error: {e}"));
    }
}
