// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Watches the ledger directory (non-recursive) and triggers a sync on
//! modifications to ledger files. Duplicate events for the same path
//! inside the debounce window are dropped; a failed sync is logged and
//! the watch loop keeps running.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

// Create events count as changes too: many editors save by writing a
// temp file and renaming it over the original, which surfaces as a
// create of the watched path rather than a modify.
pub const LEDGER_EXTENSIONS: &[&str] = &["bean", "beancount"];
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot watch {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub fn is_ledger_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| LEDGER_EXTENSIONS.contains(&ext))
}

/// Drops repeat events: only a different path, or the same path after a
/// sufficient gap, triggers again.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last: Option<(PathBuf, Instant)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn should_trigger(&mut self, path: &Path, now: Instant) -> bool {
        let trigger = match &self.last {
            Some((last_path, last_at)) => {
                last_path != path || now.duration_since(*last_at) >= self.window
            }
            None => true,
        };
        if trigger {
            self.last = Some((path.to_path_buf(), now));
        }
        trigger
    }
}

struct WatchHandle {
    // Dropping the notify watcher closes the event channel, which is what
    // lets the thread drain and exit.
    watcher: RecommendedWatcher,
    thread: JoinHandle<()>,
}

/// Owns the notify watcher and its event thread. `start` and `stop` are
/// idempotent; `stop` joins the thread before returning.
pub struct LedgerWatcher {
    path: PathBuf,
    debounce: Duration,
    on_change: Arc<dyn Fn() + Send + Sync>,
    handle: Option<WatchHandle>,
}

impl LedgerWatcher {
    pub fn new(path: PathBuf, on_change: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            path,
            debounce: DEFAULT_DEBOUNCE,
            on_change: Arc::new(on_change),
            handle: None,
        }
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.handle.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).map_err(|source| WatchError::Setup {
            path: self.path.clone(),
            source,
        })?;
        watcher
            .watch(&self.path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Setup {
                path: self.path.clone(),
                source,
            })?;

        let on_change = Arc::clone(&self.on_change);
        let window = self.debounce;
        let thread = std::thread::spawn(move || {
            let mut debouncer = Debouncer::new(window);
            while let Ok(result) = rx.recv() {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        warn!("watch event error: {}", e);
                        continue;
                    }
                };
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }
                for path in &event.paths {
                    if !is_ledger_file(path) {
                        continue;
                    }
                    if !debouncer.should_trigger(path, Instant::now()) {
                        continue;
                    }
                    info!("detected changes in {}, syncing data", path.display());
                    on_change();
                }
            }
        });

        self.handle = Some(WatchHandle { watcher, thread });
        info!("started watching for changes in {}", self.path.display());
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle.watcher);
            if handle.thread.join().is_err() {
                warn!("watch thread panicked during shutdown");
            }
            info!("stopped watching for changes");
        }
    }
}

impl Drop for LedgerWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
