//! Optional diagnostic sink for [`crate::error::PerEntryWarning`] (§7).
//!
//! Per-entry errors are never surfaced as stream items; traversal
//! continues. The host MAY subscribe to this sink to observe them.

use std::sync::Arc;

use crate::error::PerEntryWarning;

pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, warning: PerEntryWarning);
}

/// Newtype around `Arc<dyn DiagnosticSink>` so it can sit in a
/// `#[derive(Debug, Clone)]` `SearchRequest` without requiring the trait
/// object itself to implement either.
#[derive(Clone)]
pub struct DiagnosticsHandle(pub Arc<dyn DiagnosticSink>);

impl std::fmt::Debug for DiagnosticsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DiagnosticsHandle(..)")
    }
}

/// Default sink, logging through `log::debug!`/`log::warn!` — matching the
/// teacher's own `log::debug!("File search error: {error}")` convention.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl DiagnosticSink for LoggingSink {
    fn warn(&self, warning: PerEntryWarning) {
        match &warning {
            PerEntryWarning::PermissionDenied { .. } | PerEntryWarning::Loop { .. } => {
                log::debug!("{warning}");
            }
            PerEntryWarning::Vanished { .. } | PerEntryWarning::Io { .. } => {
                log::warn!("{warning}");
            }
        }
    }
}
