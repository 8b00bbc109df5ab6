//! [`EntryFilter`]: evaluates every structural and metadata predicate on a
//! single [`Entry`] in the fixed order §4.4 specifies.

use std::collections::HashSet;
use std::sync::Arc;

use globset::{GlobSet, GlobSetBuilder};

use crate::cache::PatternCache;
use crate::cache::pattern::CompiledPattern;
use crate::entry::{Entry, EntryKind};
use crate::error::PatternError;
use crate::ignore_resolver::CustomIgnoreStack;
use crate::request::{FileTypeFilter, SearchRequest};

/// Outcome of evaluating one [`Entry`]. `RejectAndPrune` applies only to
/// directories and instructs the Walker not to descend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    RejectAndPrune,
}

pub struct EntryFilter {
    glob: Arc<CompiledPattern>,
    exclude: Option<GlobSet>,
    file_type: Option<FileTypeFilter>,
    extensions: Option<HashSet<String>>,
    min_depth: Option<usize>,
    max_depth: Option<usize>,
    hidden: bool,
    custom_ignore: CustomIgnoreStack,
    min_size: Option<u64>,
    max_size: Option<u64>,
    mtime_after: Option<i64>,
    mtime_before: Option<i64>,
    atime_after: Option<i64>,
    atime_before: Option<i64>,
    ctime_after: Option<i64>,
    ctime_before: Option<i64>,
}

impl EntryFilter {
    pub fn new(request: &SearchRequest, pattern_cache: &PatternCache) -> Result<Self, PatternError> {
        let case_sensitive = request.case_sensitive.resolve(&request.glob);
        let glob = pattern_cache.get(&request.glob, case_sensitive)?;

        let exclude = if request.exclude.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &request.exclude {
                let case_sensitive = request.case_sensitive.resolve(pattern);
                let glob = globset::GlobBuilder::new(pattern)
                    .case_insensitive(!case_sensitive)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| PatternError { pattern: pattern.clone(), reason: e.to_string() })?;
                builder.add(glob);
            }
            Some(
                builder
                    .build()
                    .map_err(|e| PatternError { pattern: "exclude".into(), reason: e.to_string() })?,
            )
        };

        let extensions = request
            .extensions
            .as_ref()
            .map(|exts| exts.iter().map(|e| e.to_lowercase()).collect());

        Ok(Self {
            glob,
            exclude,
            file_type: request.file_type,
            extensions,
            min_depth: request.min_depth,
            max_depth: request.max_depth,
            hidden: request.hidden,
            custom_ignore: CustomIgnoreStack::build(&request.custom_ignore_files),
            min_size: request.min_size,
            max_size: request.max_size,
            mtime_after: request.mtime_after,
            mtime_before: request.mtime_before,
            atime_after: request.atime_after,
            atime_before: request.atime_before,
            ctime_after: request.ctime_after,
            ctime_before: request.ctime_before,
        })
    }

    /// Evaluates the predicates in the fixed order §4.4 specifies: depth,
    /// hidden/custom-ignore, file type, extension, glob, exclude, size,
    /// time. Root entries (depth 0) always `Accept` so the walk isn't pruned
    /// at its own starting point; the root itself is never subject to any
    /// predicate, but it is also never emitted as a result — the Walker
    /// skips emission for depth 0 rather than this filter attempting to
    /// distinguish "traverse" from "report".
    pub fn evaluate(&self, entry: &Entry) -> Verdict {
        let is_dir = entry.kind == EntryKind::Dir;

        // 1. Depth bounds.
        if let Some(min_depth) = self.min_depth
            && entry.depth < min_depth
        {
            return Verdict::Reject;
        }
        if let Some(max_depth) = self.max_depth
            && entry.depth > max_depth
        {
            return if is_dir { Verdict::RejectAndPrune } else { Verdict::Reject };
        }

        if entry.depth == 0 {
            return Verdict::Accept;
        }

        // 2. Hidden rule + custom-ignore-file verdict. The native
        // gitignore/.ignore/.fdignore stack (§4.3 rules 1-2) is already
        // applied by `ignore::WalkBuilder` before this entry ever reaches
        // the filter.
        if !self.hidden && entry.file_name_is_hidden() {
            return if is_dir { Verdict::RejectAndPrune } else { Verdict::Reject };
        }
        if self.custom_ignore.is_ignored(&entry.path, is_dir) {
            return if is_dir { Verdict::RejectAndPrune } else { Verdict::Reject };
        }

        // 3. file_type filter. A non-matching directory is *rejected*, not
        // pruned: its descendants may still match even though it doesn't.
        if let Some(file_type) = self.file_type {
            let matches = match (file_type, entry.kind) {
                (FileTypeFilter::File, EntryKind::File) => true,
                (FileTypeFilter::Dir, EntryKind::Dir) => true,
                (FileTypeFilter::Symlink, EntryKind::Symlink) => true,
                _ => false,
            };
            if !matches {
                return Verdict::Reject;
            }
        }

        // 4. Extension filter (path-only, no syscalls). Same rationale:
        // reject without pruning.
        if let Some(extensions) = &self.extensions {
            let matches = entry
                .extension()
                .is_some_and(|ext| extensions.contains(&ext.to_lowercase()));
            if !matches {
                return Verdict::Reject;
            }
        }

        // 5. Glob match. Same rationale: reject without pruning.
        if !self.glob.matches(&entry.path) {
            return Verdict::Reject;
        }

        // 6. Exclude patterns.
        if let Some(exclude) = &self.exclude
            && exclude.is_match(&entry.path)
        {
            return if is_dir { Verdict::RejectAndPrune } else { Verdict::Reject };
        }

        // 7. Size filter (stat, regular files only).
        if (self.min_size.is_some() || self.max_size.is_some()) && entry.kind == EntryKind::File {
            let Some(size) = entry.metadata().size(&entry.path) else {
                return Verdict::Reject;
            };
            if self.min_size.is_some_and(|min| size < min) || self.max_size.is_some_and(|max| size > max) {
                return Verdict::Reject;
            }
        }

        // 8. Time filters.
        if !self.time_predicate_passes(entry) {
            return Verdict::Reject;
        }

        Verdict::Accept
    }

    fn time_predicate_passes(&self, entry: &Entry) -> bool {
        if self.mtime_after.is_some() || self.mtime_before.is_some() {
            let Some(mtime) = entry.metadata().mtime(&entry.path) else {
                return false;
            };
            if self.mtime_after.is_some_and(|after| mtime < after)
                || self.mtime_before.is_some_and(|before| mtime > before)
            {
                return false;
            }
        }
        if self.atime_after.is_some() || self.atime_before.is_some() {
            let Some(atime) = entry.metadata().atime(&entry.path) else {
                return false;
            };
            if self.atime_after.is_some_and(|after| atime < after)
                || self.atime_before.is_some_and(|before| atime > before)
            {
                return false;
            }
        }
        if self.ctime_after.is_some() || self.ctime_before.is_some() {
            // Unsupported platforms: treated as "no matching entry" (§4.4).
            let Some(ctime) = entry.metadata().ctime(&entry.path) else {
                return false;
            };
            if self.ctime_after.is_some_and(|after| ctime < after)
                || self.ctime_before.is_some_and(|before| ctime > before)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SearchRequest;
    use std::path::PathBuf;

    fn filter_for(request: &SearchRequest) -> EntryFilter {
        EntryFilter::new(request, &PatternCache::new()).expect("filter builds")
    }

    #[test]
    fn min_depth_rejects_without_pruning() {
        let request = SearchRequest::builder().root(".").min_depth(2).build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("a/b"), EntryKind::Dir, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
    }

    #[test]
    fn max_depth_rejects_and_prunes_directories() {
        let request = SearchRequest::builder().root(".").max_depth(1).build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("a/b"), EntryKind::Dir, 2);
        assert_eq!(filter.evaluate(&entry), Verdict::RejectAndPrune);
    }

    #[test]
    fn hidden_entries_rejected_by_default() {
        let request = SearchRequest::builder().root(".").build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from(".hidden"), EntryKind::File, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
    }

    #[test]
    fn hidden_entries_accepted_when_requested() {
        let request = SearchRequest::builder().root(".").hidden(true).glob("*").build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from(".hidden"), EntryKind::File, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Accept);
    }

    #[test]
    fn glob_rejects_non_matching_files() {
        let request = SearchRequest::builder().root(".").glob("*.py").build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("a.txt"), EntryKind::File, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
        let entry = Entry::new(PathBuf::from("a.py"), EntryKind::File, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Accept);
    }

    #[test]
    fn exclude_prunes_directories() {
        let request = SearchRequest::builder()
            .root(".")
            .glob("*")
            .exclude("build")
            .build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("build"), EntryKind::Dir, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::RejectAndPrune);
    }

    #[test]
    fn non_matching_directory_is_rejected_but_not_pruned() {
        let request = SearchRequest::builder().root(".").glob("*.py").build();
        let filter = filter_for(&request);
        // `sub` itself doesn't match `*.py`, but it must stay `Reject` (not
        // `RejectAndPrune`) so that e.g. `sub/inner.py` is still reachable.
        let entry = Entry::new(PathBuf::from("sub"), EntryKind::Dir, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
    }

    #[test]
    fn file_type_filter_rejects_directories_without_pruning() {
        let request = SearchRequest::builder()
            .root(".")
            .glob("*")
            .file_type(FileTypeFilter::File)
            .build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("sub"), EntryKind::Dir, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
    }

    #[test]
    fn extension_filter_rejects_directories_without_pruning() {
        let request = SearchRequest::builder()
            .root(".")
            .glob("*")
            .extensions(["py".to_string()])
            .build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("sub"), EntryKind::Dir, 1);
        assert_eq!(filter.evaluate(&entry), Verdict::Reject);
    }

    #[test]
    fn root_entry_always_accepts_regardless_of_predicates() {
        let request = SearchRequest::builder()
            .root(".")
            .glob("*.py")
            .file_type(FileTypeFilter::File)
            .build();
        let filter = filter_for(&request);
        let entry = Entry::new(PathBuf::from("/some/root"), EntryKind::Dir, 0);
        assert_eq!(filter.evaluate(&entry), Verdict::Accept);
    }
}
