//! Configuration file watching for hot reload
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a new file and renaming it over the old one are
//! still noticed.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Default debounce window for file changes
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Reports when a single file has changed on disk
pub struct ConfigWatcher {
    path: PathBuf,
    events: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ConfigWatcher {
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        let path = path.as_ref();
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(debounce, tx)?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {} for changes", path.display());

        Ok(Self {
            path,
            events: rx,
            _debouncer: debouncer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events; true if any of them touched the watched file
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.events.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|event| self.is_watched(&event.path));
                }
                Err(e) => tracing::warn!("File watch error: {}", e),
            }
        }
        changed
    }

    fn is_watched(&self, candidate: &Path) -> bool {
        candidate == self.path
            || candidate
                .canonicalize()
                .map(|c| c == self.path)
                .unwrap_or(false)
    }
}
