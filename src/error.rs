use std::path::PathBuf;

/// Error surfaced synchronously at the entry point, before any traversal work.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("min_depth ({min_depth}) is greater than max_depth ({max_depth})")]
    DepthBounds { min_depth: usize, max_depth: usize },

    #[error("min_size ({min_size}) is greater than max_size ({max_size})")]
    SizeBounds { min_size: u64, max_size: u64 },

    #[error("{field}_after is greater than {field}_before")]
    TimeBounds { field: &'static str },

    #[error("roots must be non-empty")]
    EmptyRoots,

    #[error("search() requires a content_regex")]
    MissingContentRegex,
}

/// Invalid glob or regex; carries the offending pattern and a reason.
#[derive(Debug, thiserror::Error)]
#[error("invalid pattern `{pattern}`: {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

/// Non-recoverable I/O during the walk, scoped to a single root.
#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("root `{root}` does not exist")]
    RootNotFound { root: PathBuf },

    #[error("root `{root}` could not be opened: {source}")]
    RootUnreadable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error returned from `find`/`search` before the stream starts.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Permission denied, broken directory, vanished file, unreadable file during
/// content search. Never surfaced as a stream item; routed through a
/// [`crate::diagnostics::DiagnosticSink`]. Traversal continues regardless.
#[derive(Debug, Clone)]
pub enum PerEntryWarning {
    PermissionDenied { path: PathBuf },
    Vanished { path: PathBuf },
    Io { path: PathBuf, message: String },
    Loop { path: PathBuf },
}

impl std::fmt::Display for PerEntryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerEntryWarning::PermissionDenied { path } => {
                write!(f, "permission denied: {}", path.display())
            }
            PerEntryWarning::Vanished { path } => write!(f, "vanished: {}", path.display()),
            PerEntryWarning::Io { path, message } => {
                write!(f, "io error on {}: {message}", path.display())
            }
            PerEntryWarning::Loop { path } => write!(f, "symlink loop at {}", path.display()),
        }
    }
}

/// One item of the stream sent to the host: either a result or a
/// root-scoped [`TraversalError`]. Per-entry errors never appear here.
#[derive(Debug)]
pub enum StreamItem<T> {
    Item(T),
    RootError(TraversalError),
}
