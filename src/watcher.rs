//! Stores directory watcher
//!
//! Filesystem events arrive on the notify thread and are coalesced per path over a short
//! window. Each batch is then handed to the [`Context`] on the calling thread, one path at a
//! time, so rebuilds never overlap.

use crate::config::is_typescript_source;
use crate::context::{Context, FileEventKind, WatchOutcome};
use crate::error::Result;
use indexmap::IndexMap;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const BATCH_WINDOW: Duration = Duration::from_millis(200);

/// Map a notify event onto the changes the session understands
///
/// Renames are split into a removal of the old path and an addition of the new one.
pub fn classify_event(event: &Event) -> Vec<(FileEventKind, PathBuf)> {
    let kind = match event.kind {
        EventKind::Create(_) => FileEventKind::Added,
        EventKind::Remove(_) => FileEventKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FileEventKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FileEventKind::Added,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.iter();
            return paths
                .next()
                .map(|from| (FileEventKind::Removed, from.clone()))
                .into_iter()
                .chain(paths.next().map(|to| (FileEventKind::Added, to.clone())))
                .collect();
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => FileEventKind::Changed,
        _ => return Vec::new(),
    };

    event.paths.iter().map(|path| (kind, path.clone())).collect()
}

/// Changes collected during one batch window, last event per path wins
#[derive(Debug, Default)]
pub struct PendingChanges {
    changes: IndexMap<PathBuf, FileEventKind>,
}

impl PendingChanges {
    pub fn push(&mut self, kind: FileEventKind, path: PathBuf) {
        if path.is_dir() || !is_typescript_source(&path) {
            return;
        }

        let kind = match (self.changes.get(&path), kind) {
            // Created then written inside one window is still an addition
            (Some(FileEventKind::Added), FileEventKind::Changed) => FileEventKind::Added,
            _ => kind,
        };
        self.changes.insert(path, kind);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn drain(&mut self) -> Vec<(FileEventKind, PathBuf)> {
        self.changes
            .drain(..)
            .map(|(path, kind)| (kind, path))
            .collect()
    }
}

/// Watch the stores directory until `running` is cleared or the watcher disconnects
pub fn watch_stores(context: &mut Context, running: &AtomicBool) -> Result<()> {
    let (event_tx, event_rx) = channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let stores_dir = context.config().stores_dir.clone();
    watcher.watch(&stores_dir, RecursiveMode::Recursive)?;
    info!("Watching {} for store changes", stores_dir.display());

    let mut pending = PendingChanges::default();
    while running.load(Ordering::SeqCst) {
        match event_rx.recv_timeout(BATCH_WINDOW) {
            Ok(Ok(event)) => {
                for (kind, path) in classify_event(&event) {
                    pending.push(kind, path);
                }
            }
            Ok(Err(e)) => warn!("Watch error: {:?}", e),
            Err(RecvTimeoutError::Timeout) => flush(context, &mut pending),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    flush(context, &mut pending);
    info!("Stopped watching {}", stores_dir.display());
    Ok(())
}

fn flush(context: &mut Context, pending: &mut PendingChanges) {
    if pending.is_empty() {
        return;
    }
    debug!("Handling {} file changes", pending.len());

    for (kind, path) in pending.drain() {
        match context.handle_file_event(kind, &path) {
            Ok(WatchOutcome::Rebuilt(report)) => {
                debug!(
                    "Rebuilt after {} of {}: {} written, {} unchanged",
                    kind.as_str(),
                    path.display(),
                    report.written.len(),
                    report.unchanged.len()
                );
            }
            Ok(outcome) => debug!("{} {}: {:?}", kind.as_str(), path.display(), outcome),
            Err(e) => error!("Failed to handle {} of {}: {}", kind.as_str(), path.display(), e),
        }
        context.take_diagnostics().print();
    }
}
