//! Result types and the bounded channel that carries them to the host (§3,
//! §4.8).

use std::path::PathBuf;

use crate::error::{StreamItem, TraversalError};

/// `find` result: a single matching path (§3 `PathResult`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub path: PathBuf,
}

/// `search` result: one matching line within one file (§3 `ContentMatch`).
/// One result per matching line, not per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMatch {
    pub path: PathBuf,
    pub line_number: u64,
    pub line: String,
    pub matches: Vec<String>,
}

/// Coarse category used to pick [`ResultChannel`] capacity at walk start
/// (§4.8, §9 "no deep inheritance": a tagged variant, not a subclass
/// hierarchy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadClass {
    /// Sorting forces full buffering; minimize producer stalls.
    Sorted,
    /// Each result carries a line of text; bound memory.
    ContentSearch,
    /// Plain path enumeration.
    StandardFind { threads: usize },
}

impl WorkloadClass {
    pub fn channel_capacity(self) -> usize {
        match self {
            WorkloadClass::Sorted => 64 * 1024,
            WorkloadClass::ContentSearch => 1024,
            WorkloadClass::StandardFind { threads } => {
                let threads = threads.max(1);
                (threads * 2048).clamp(4096, 16 * 1024)
            }
        }
    }
}

/// Bounded multi-producer/single-consumer queue delivering results to the
/// host (§4.8). A thin alias over `crossbeam_channel` so the rest of the
/// crate speaks in domain terms.
pub fn result_channel<T>(
    workload: WorkloadClass,
) -> (crossbeam_channel::Sender<StreamItem<T>>, crossbeam_channel::Receiver<StreamItem<T>>) {
    crossbeam_channel::bounded(workload.channel_capacity())
}

/// Lazy, non-restartable stream of `find` results (§9 "lazy-sequence
/// contracts... preserved").
pub struct FindStream {
    receiver: Option<crossbeam_channel::Receiver<StreamItem<PathResult>>>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl FindStream {
    pub(crate) fn new(
        receiver: crossbeam_channel::Receiver<StreamItem<PathResult>>,
        handle: std::thread::JoinHandle<()>,
    ) -> Self {
        Self { receiver: Some(receiver), handle: Some(handle) }
    }
}

impl Iterator for FindStream {
    type Item = Result<PathResult, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.receiver.as_ref()?.recv() {
            Ok(StreamItem::Item(item)) => Some(Ok(item)),
            Ok(StreamItem::RootError(error)) => Some(Err(error)),
            Err(_) => None,
        }
    }
}

impl Drop for FindStream {
    fn drop(&mut self) {
        // Dropping `receiver` first signals cancellation; workers observe
        // the closed channel on their next send (§5).
        self.receiver.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Lazy, non-restartable stream of `search` results.
pub struct SearchStream {
    receiver: Option<crossbeam_channel::Receiver<StreamItem<ContentMatch>>>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl SearchStream {
    pub(crate) fn new(
        receiver: crossbeam_channel::Receiver<StreamItem<ContentMatch>>,
        handle: std::thread::JoinHandle<()>,
    ) -> Self {
        Self { receiver: Some(receiver), handle: Some(handle) }
    }
}

impl Iterator for SearchStream {
    type Item = Result<ContentMatch, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.receiver.as_ref()?.recv() {
            Ok(StreamItem::Item(item)) => Some(Ok(item)),
            Ok(StreamItem::RootError(error)) => Some(Err(error)),
            Err(_) => None,
        }
    }
}

impl Drop for SearchStream {
    fn drop(&mut self) {
        self.receiver.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
