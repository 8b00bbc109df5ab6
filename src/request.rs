//! The engine's configuration surface: [`SearchRequest`] and its builder.

use std::path::PathBuf;

use crate::error::ConfigError;

/// File-type predicate (§3 `file_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTypeFilter {
    File,
    Dir,
    Symlink,
}

/// Case-sensitivity tri-state shared by glob and content-regex matching
/// (Open Question 1 resolution: one flag governs both).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitive {
    Sensitive,
    Insensitive,
    #[default]
    Smart,
}

impl CaseSensitive {
    /// Resolve smart-case against a pattern: sensitive iff the pattern
    /// contains any uppercase letter.
    pub fn resolve(self, pattern: &str) -> bool {
        match self {
            CaseSensitive::Sensitive => true,
            CaseSensitive::Insensitive => false,
            CaseSensitive::Smart => pattern.chars().any(char::is_uppercase),
        }
    }
}

/// Sort criterion for a request (§3 `sort`, §8 property 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Path,
    Size,
    Mtime,
}

/// Sort direction, ascending by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Per-call configuration, immutable once the walk starts (§3).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub roots: Vec<PathBuf>,
    pub glob: String,
    pub content_regex: Option<String>,
    pub file_type: Option<FileTypeFilter>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub mtime_after: Option<i64>,
    pub mtime_before: Option<i64>,
    pub atime_after: Option<i64>,
    pub atime_before: Option<i64>,
    pub ctime_after: Option<i64>,
    pub ctime_before: Option<i64>,
    pub hidden: bool,
    pub respect_vcs_ignores: bool,
    pub custom_ignore_files: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub same_file_system: bool,
    pub case_sensitive: CaseSensitive,
    pub sort: Option<SortBy>,
    pub sort_direction: SortDirection,
    pub threads: usize,
    /// Pluggable `DiagnosticSink` for per-entry warnings (§7). `None` falls
    /// back to the default `LoggingSink`.
    pub diagnostics: Option<crate::diagnostics::DiagnosticsHandle>,
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    /// Validates the cross-field invariants from §3. Called once at the
    /// `find`/`search` entry point, before any traversal work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roots.is_empty() {
            return Err(ConfigError::EmptyRoots);
        }
        if let (Some(min_depth), Some(max_depth)) = (self.min_depth, self.max_depth)
            && min_depth > max_depth
        {
            return Err(ConfigError::DepthBounds { min_depth, max_depth });
        }
        if let (Some(min_size), Some(max_size)) = (self.min_size, self.max_size)
            && min_size > max_size
        {
            return Err(ConfigError::SizeBounds { min_size, max_size });
        }
        check_time_bounds("mtime", self.mtime_after, self.mtime_before)?;
        check_time_bounds("atime", self.atime_after, self.atime_before)?;
        check_time_bounds("ctime", self.ctime_after, self.ctime_before)?;
        Ok(())
    }
}

fn check_time_bounds(
    field: &'static str,
    after: Option<i64>,
    before: Option<i64>,
) -> Result<(), ConfigError> {
    if let (Some(after), Some(before)) = (after, before)
        && after > before
    {
        return Err(ConfigError::TimeBounds { field });
    }
    Ok(())
}

/// Ergonomic construction matching the teacher's `SearchSessionOptions`
/// builder style.
#[derive(Debug, Default)]
pub struct SearchRequestBuilder {
    roots: Vec<PathBuf>,
    glob: Option<String>,
    content_regex: Option<String>,
    file_type: Option<FileTypeFilter>,
    extensions: Option<Vec<String>>,
    exclude: Vec<String>,
    min_depth: Option<usize>,
    max_depth: Option<usize>,
    min_size: Option<u64>,
    max_size: Option<u64>,
    mtime_after: Option<i64>,
    mtime_before: Option<i64>,
    atime_after: Option<i64>,
    atime_before: Option<i64>,
    ctime_after: Option<i64>,
    ctime_before: Option<i64>,
    hidden: bool,
    respect_vcs_ignores: bool,
    custom_ignore_files: Vec<PathBuf>,
    follow_symlinks: bool,
    same_file_system: bool,
    case_sensitive: CaseSensitive,
    sort: Option<SortBy>,
    sort_direction: SortDirection,
    threads: usize,
    diagnostics: Option<crate::diagnostics::DiagnosticsHandle>,
}

impl SearchRequestBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.roots.extend(roots);
        self
    }

    pub fn glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = Some(glob.into());
        self
    }

    pub fn content_regex(mut self, pattern: impl Into<String>) -> Self {
        self.content_regex = Some(pattern.into());
        self
    }

    pub fn file_type(mut self, file_type: FileTypeFilter) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn extensions(mut self, extensions: impl IntoIterator<Item = String>) -> Self {
        self.extensions = Some(extensions.into_iter().collect());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    pub fn min_depth(mut self, depth: usize) -> Self {
        self.min_depth = Some(depth);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = Some(bytes);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    pub fn mtime_after(mut self, unix_secs: i64) -> Self {
        self.mtime_after = Some(unix_secs);
        self
    }

    pub fn mtime_before(mut self, unix_secs: i64) -> Self {
        self.mtime_before = Some(unix_secs);
        self
    }

    pub fn atime_after(mut self, unix_secs: i64) -> Self {
        self.atime_after = Some(unix_secs);
        self
    }

    pub fn atime_before(mut self, unix_secs: i64) -> Self {
        self.atime_before = Some(unix_secs);
        self
    }

    pub fn ctime_after(mut self, unix_secs: i64) -> Self {
        self.ctime_after = Some(unix_secs);
        self
    }

    pub fn ctime_before(mut self, unix_secs: i64) -> Self {
        self.ctime_before = Some(unix_secs);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn respect_vcs_ignores(mut self, respect: bool) -> Self {
        self.respect_vcs_ignores = respect;
        self
    }

    pub fn custom_ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_ignore_files.push(path.into());
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn same_file_system(mut self, same: bool) -> Self {
        self.same_file_system = same;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: CaseSensitive) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn sort(mut self, sort_by: SortBy, direction: SortDirection) -> Self {
        self.sort = Some(sort_by);
        self.sort_direction = direction;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Routes per-entry warnings (§7 `PerEntryWarning`) to a caller-supplied
    /// sink instead of the default `LoggingSink`.
    pub fn diagnostics(mut self, sink: impl crate::diagnostics::DiagnosticSink + 'static) -> Self {
        self.diagnostics = Some(crate::diagnostics::DiagnosticsHandle(std::sync::Arc::new(sink)));
        self
    }

    pub fn build(self) -> SearchRequest {
        SearchRequest {
            roots: self.roots,
            glob: self.glob.unwrap_or_else(|| "*".to_string()),
            content_regex: self.content_regex,
            file_type: self.file_type,
            extensions: self.extensions,
            exclude: self.exclude,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            min_size: self.min_size,
            max_size: self.max_size,
            mtime_after: self.mtime_after,
            mtime_before: self.mtime_before,
            atime_after: self.atime_after,
            atime_before: self.atime_before,
            ctime_after: self.ctime_after,
            ctime_before: self.ctime_before,
            hidden: self.hidden,
            respect_vcs_ignores: self.respect_vcs_ignores,
            custom_ignore_files: self.custom_ignore_files,
            follow_symlinks: self.follow_symlinks,
            same_file_system: self.same_file_system,
            case_sensitive: self.case_sensitive,
            sort: self.sort,
            sort_direction: self.sort_direction,
            threads: self.threads,
            diagnostics: self.diagnostics,
        }
    }
}
