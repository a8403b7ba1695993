//! Application context: the working set, the view over it, and the
//! transient state the interface reads (importing flag, selection, notice).
//!
//! Failures from user actions end up here as a single notice string; the
//! view never sees an error.

use log::{info, warn};
use std::path::Path;

use crate::config::Config;
use crate::error::ImportError;
use crate::import::{self, ImportGate, ImportOptions, ImportSummary};
use crate::models::{Person, Stats};
use crate::store::{BlobStore, WorkingSet};
use crate::view::ViewState;

pub struct Session<S: BlobStore> {
    set: WorkingSet<S>,
    view: ViewState,
    stats: Stats,
    gate: ImportGate,
    options: ImportOptions,
    selected: Option<String>,
    notice: Option<String>,
}

impl<S: BlobStore> Session<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self::with_options(
            store,
            config.page_size,
            ImportOptions {
                yield_every: config.yield_every,
            },
        )
    }

    pub fn with_options(store: S, page_size: usize, options: ImportOptions) -> Self {
        let set = WorkingSet::open(store);
        let mut view = ViewState::new(page_size);
        view.rebuild(set.people());
        let stats = set.stats();
        Self {
            set,
            view,
            stats,
            gate: ImportGate::new(),
            options,
            selected: None,
            notice: None,
        }
    }

    // ==================== READ ====================

    pub fn people(&self) -> &[Person] {
        self.set.people()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.set.get(id)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn completion_percent(&self) -> u32 {
        self.stats.completion_percent()
    }

    pub fn query(&self) -> &str {
        self.view.query()
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Person> + '_ {
        self.view.filtered(self.set.people())
    }

    pub fn filtered_len(&self) -> usize {
        self.view.filtered_len()
    }

    pub fn visible(&self) -> Vec<&Person> {
        self.view.visible(self.set.people())
    }

    pub fn display_limit(&self) -> usize {
        self.view.display_limit()
    }

    pub fn has_more(&self) -> bool {
        self.view.has_more()
    }

    pub fn is_importing(&self) -> bool {
        self.gate.is_importing()
    }

    /// Shared handle on the import gate, for cancelling from a signal handler.
    pub fn import_gate(&self) -> ImportGate {
        self.gate.clone()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn selected(&self) -> Option<&Person> {
        self.selected.as_deref().and_then(|id| self.set.get(id))
    }

    // ==================== ACTIONS ====================

    /// Import raw file bytes. On failure the notice is set and the working
    /// set is unchanged.
    pub async fn import(&mut self, bytes: &[u8]) -> Result<ImportSummary, ImportError> {
        let guard = match self.gate.try_begin() {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e)),
        };
        self.notice = None;

        let result =
            import::import_bytes(&mut self.set, bytes, &self.options, guard.cancel_flag()).await;
        drop(guard);

        match result {
            Ok(summary) => {
                self.refresh();
                self.view.reset_window();
                Ok(summary)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Read `path` and import it.
    pub async fn import_file(&mut self, path: &Path) -> Result<ImportSummary, ImportError> {
        info!("importing {}", path.display());
        match import::read_file(path).await {
            Ok(bytes) => self.import(&bytes).await,
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Flip completion for `id`. Unknown ids are ignored. Returns whether a
    /// person changed.
    pub fn toggle_completion(&mut self, id: &str) -> bool {
        match self.set.toggle_completion(id) {
            Ok(changed) => {
                if changed {
                    self.notice = None;
                    self.stats = self.set.stats();
                }
                changed
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                false
            }
        }
    }

    /// Remove every person. Returns whether the set is now empty.
    pub fn clear_all(&mut self) -> bool {
        match self.set.clear() {
            Ok(()) => {
                self.notice = None;
                self.selected = None;
                self.refresh();
                self.view.reset_window();
                true
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                false
            }
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.view.set_query(query, self.set.people());
    }

    /// Load-more trigger fired.
    pub fn request_more(&mut self) -> bool {
        self.view.request_more()
    }

    pub fn select_for_detail(&mut self, id: &str) -> bool {
        if self.set.get(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn refresh(&mut self) {
        self.view.rebuild(self.set.people());
        self.stats = self.set.stats();
    }

    fn fail(&mut self, err: ImportError) -> ImportError {
        warn!("import failed: {}", err);
        self.notice = Some(err.to_string());
        err
    }
}
