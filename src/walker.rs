//! Walker: parallel directory traversal driver (§4.5).
//!
//! Grounded on the teacher's `file_search` visitor/builder pair for the
//! overall `ignore::WalkBuilder` configuration, and on the
//! `havenwood-fdr`/`higrep` other-example files for the closure-based
//! `WalkParallel::run` driver and the dedicated driver-thread +
//! `crossbeam_channel` shape that lets `find`/`search` return a lazy
//! stream immediately instead of blocking until the whole tree is walked.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::thread;

use ignore::{WalkBuilder, WalkState};

use crate::diagnostics::DiagnosticSink;
use crate::entry::{Entry, EntryKind};
use crate::error::{PerEntryWarning, StreamItem, TraversalError};
use crate::filter::{EntryFilter, Verdict};
use crate::request::SearchRequest;
use crate::result::{result_channel, WorkloadClass};
use crate::sort::{sort_indices, SortKey};

/// Spawns the background driver thread and returns the receiver + handle
/// the `FindStream`/`SearchStream` newtypes wrap.
///
/// `process` runs once per Accepted entry (on whichever worker thread
/// visited it) and returns zero or more results, in the order they should
/// appear for that single entry (e.g. the content-search matches for one
/// file, lowest line number first).
pub(crate) fn drive<T, F>(
    request: SearchRequest,
    filter: Arc<EntryFilter>,
    workload: WorkloadClass,
    process: F,
) -> (crossbeam_channel::Receiver<StreamItem<T>>, thread::JoinHandle<()>)
where
    T: Send + 'static,
    F: Fn(&Entry, &EntryFilter) -> Vec<T> + Send + Sync + 'static,
{
    let (sender, receiver) = result_channel::<T>(workload);
    let handle = thread::spawn(move || run_walk(request, filter, sender, process));
    (receiver, handle)
}

fn run_walk<T, F>(
    request: SearchRequest,
    filter: Arc<EntryFilter>,
    sender: crossbeam_channel::Sender<StreamItem<T>>,
    process: F,
) where
    T: Send + 'static,
    F: Fn(&Entry, &EntryFilter) -> Vec<T> + Send + Sync + 'static,
{
    let mut existing_roots = Vec::with_capacity(request.roots.len());
    for root in &request.roots {
        match std::fs::symlink_metadata(root) {
            Ok(_) => existing_roots.push(root.clone()),
            Err(_) => {
                if sender
                    .send(StreamItem::RootError(TraversalError::RootNotFound { root: root.clone() }))
                    .is_err()
                {
                    return;
                }
            }
        }
    }
    if existing_roots.is_empty() {
        return;
    }

    let Some((first_root, rest_roots)) = existing_roots.split_first() else { return };
    let mut builder = WalkBuilder::new(first_root);
    for root in rest_roots {
        builder.add(root);
    }

    builder
        .hidden(!request.hidden)
        .ignore(request.respect_vcs_ignores)
        .git_ignore(request.respect_vcs_ignores)
        .git_global(request.respect_vcs_ignores)
        .git_exclude(request.respect_vcs_ignores)
        .parents(request.respect_vcs_ignores)
        .add_custom_ignore_filename(".fdignore")
        .follow_links(request.follow_symlinks)
        .same_file_system(request.same_file_system)
        .threads(request.threads);

    if let Some(max_depth) = request.max_depth {
        builder.max_depth(Some(max_depth));
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let process = Arc::new(process);
    let sink: Arc<dyn DiagnosticSink> = request
        .diagnostics
        .clone()
        .map(|handle| handle.0)
        .unwrap_or_else(|| Arc::new(crate::diagnostics::LoggingSink));
    // Per-root "at most once" bookkeeping (Open Question 3 resolution):
    // each root gets its own seen-paths set, keyed by the root index.
    let seen: Arc<Mutex<HashMap<usize, HashSet<PathBuf>>>> = Arc::new(Mutex::new(HashMap::new()));
    let roots_for_index = existing_roots.clone();

    let sorted = request.sort.is_some();
    let buffer: Arc<Mutex<Vec<(SortKey, Vec<T>)>>> = Arc::new(Mutex::new(Vec::new()));

    let walker = builder.build_parallel();
    walker.run(|| {
        let filter = Arc::clone(&filter);
        let process = Arc::clone(&process);
        let sink = Arc::clone(&sink);
        let sender = sender.clone();
        let cancelled = Arc::clone(&cancelled);
        let seen = Arc::clone(&seen);
        let roots_for_index = roots_for_index.clone();
        let buffer = Arc::clone(&buffer);

        Box::new(move |result| {
            if cancelled.load(AtomicOrdering::Relaxed) {
                return WalkState::Quit;
            }

            let dir_entry = match result {
                Ok(entry) => entry,
                Err(ignore::Error::Loop { ref child, .. }) => {
                    sink.warn(PerEntryWarning::Loop { path: child.clone() });
                    return WalkState::Continue;
                }
                Err(error) => {
                    if let Some(path) = error.path() {
                        let is_root = roots_for_index.iter().any(|root| root == path);
                        if is_root && let Some(io_err) = error.io_error() {
                            let traversal_error = TraversalError::RootUnreadable {
                                root: path.to_path_buf(),
                                source: clone_io_error(io_err),
                            };
                            if sender.send(StreamItem::RootError(traversal_error)).is_err() {
                                cancelled.store(true, AtomicOrdering::Relaxed);
                                return WalkState::Quit;
                            }
                            return WalkState::Continue;
                        }
                        let warning = if error.io_error().is_some_and(|e| {
                            e.kind() == std::io::ErrorKind::PermissionDenied
                        }) {
                            PerEntryWarning::PermissionDenied { path: path.to_path_buf() }
                        } else {
                            PerEntryWarning::Io { path: path.to_path_buf(), message: error.to_string() }
                        };
                        sink.warn(warning);
                    }
                    return WalkState::Continue;
                }
            };

            let path = dir_entry.path().to_path_buf();
            let depth = dir_entry.depth();
            let kind = EntryKind::from(dir_entry.file_type());

            if let Some(root_index) = root_index_for(&path, &roots_for_index) {
                let mut guard = seen.lock().unwrap_or_else(|e| e.into_inner());
                let root_seen = guard.entry(root_index).or_default();
                if !root_seen.insert(path.clone()) {
                    return WalkState::Continue;
                }
            }

            let entry = Entry::new(path.clone(), kind, depth);
            match filter.evaluate(&entry) {
                Verdict::Reject => return WalkState::Continue,
                Verdict::RejectAndPrune => return WalkState::Skip,
                Verdict::Accept => {}
            }

            // A root entry (depth 0) always passes `EntryFilter::evaluate`
            // so the walk itself isn't pruned at its own starting point, but
            // it is never a *result* — only entries discovered underneath a
            // root are (§4.4, §4.5).
            if depth == 0 {
                return WalkState::Continue;
            }

            let items = process(&entry, &filter);
            if items.is_empty() {
                return WalkState::Continue;
            }

            if sorted {
                let key = SortKey {
                    path: entry.path.clone(),
                    size: entry.metadata().size(&entry.path),
                    mtime: entry.metadata().mtime(&entry.path),
                };
                buffer.lock().unwrap_or_else(|e| e.into_inner()).push((key, items));
                return WalkState::Continue;
            }

            for item in items {
                if sender.send(StreamItem::Item(item)).is_err() {
                    cancelled.store(true, AtomicOrdering::Relaxed);
                    return WalkState::Quit;
                }
            }

            WalkState::Continue
        })
    });

    if sorted {
        let mut buffered = Arc::try_unwrap(buffer)
            .map(|m| m.into_inner().unwrap_or_else(|e| e.into_inner()))
            .unwrap_or_default();
        let keys: Vec<SortKey> = buffered.iter().map(|(key, _)| key.clone()).collect();
        let order = sort_indices(&keys, request.sort.expect("sorted implies Some"), request.sort_direction);
        for index in order {
            let items = std::mem::take(&mut buffered[index].1);
            for item in items {
                if sender.send(StreamItem::Item(item)).is_err() {
                    break;
                }
            }
        }
    }
}

fn root_index_for(path: &std::path::Path, roots: &[PathBuf]) -> Option<usize> {
    roots.iter().position(|root| path.starts_with(root) || path == root)
}

/// `io::Error` isn't `Clone`; `ignore::Error::io_error()` only hands back a
/// borrow, so `TraversalError::RootUnreadable` needs its own owned copy.
fn clone_io_error(error: &std::io::Error) -> std::io::Error {
    std::io::Error::new(error.kind(), error.to_string())
}
