//! [`Entry`]: the transient, per-directory-entry value produced by the
//! [`crate::walker::Walker`] and consumed by [`crate::filter::EntryFilter`].

use std::path::{Path, PathBuf};

/// Entry kind, mirroring `ignore::DirEntry::file_type()` without pulling the
/// `ignore` type into the filter's public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl From<Option<std::fs::FileType>> for EntryKind {
    fn from(file_type: Option<std::fs::FileType>) -> Self {
        match file_type {
            Some(ft) if ft.is_file() => EntryKind::File,
            Some(ft) if ft.is_dir() => EntryKind::Dir,
            Some(ft) if ft.is_symlink() => EntryKind::Symlink,
            _ => EntryKind::Other,
        }
    }
}

/// Lazily-fetched, memoized metadata for one [`Entry`]. Fetched at most once
/// per entry (§4.4: "Metadata is fetched at most once per Entry").
#[derive(Debug, Default)]
pub struct LazyMetadata {
    inner: std::cell::OnceCell<Option<std::fs::Metadata>>,
}

impl LazyMetadata {
    fn get(&self, path: &Path) -> Option<&std::fs::Metadata> {
        self.inner
            .get_or_init(|| std::fs::symlink_metadata(path).ok())
            .as_ref()
    }

    pub fn size(&self, path: &Path) -> Option<u64> {
        self.get(path).map(|m| m.len())
    }

    pub fn mtime(&self, path: &Path) -> Option<i64> {
        self.get(path).and_then(system_time_to_unix_secs_modified)
    }

    pub fn atime(&self, path: &Path) -> Option<i64> {
        self.get(path).and_then(system_time_to_unix_secs_accessed)
    }

    /// Resolves Open Question 2: inode-change time on Unix, birth-time
    /// elsewhere, `None` if neither is available.
    pub fn ctime(&self, path: &Path) -> Option<i64> {
        let metadata = self.get(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Some(metadata.ctime())
        }
        #[cfg(not(unix))]
        {
            metadata
                .created()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
        }
    }

    pub fn device_id(&self, path: &Path) -> Option<u64> {
        let metadata = self.get(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Some(metadata.dev())
        }
        #[cfg(not(unix))]
        {
            let _ = metadata;
            None
        }
    }
}

fn system_time_to_unix_secs_modified(metadata: &std::fs::Metadata) -> Option<i64> {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
}

fn system_time_to_unix_secs_accessed(metadata: &std::fs::Metadata) -> Option<i64> {
    metadata
        .accessed()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
}

/// One directory entry flowing from [`crate::walker::Walker`] into
/// [`crate::filter::EntryFilter`]. Never shared across threads.
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub depth: usize,
    metadata: LazyMetadata,
}

impl Entry {
    pub fn new(path: PathBuf, kind: EntryKind, depth: usize) -> Self {
        Self { path, kind, depth, metadata: LazyMetadata::default() }
    }

    pub fn metadata(&self) -> &LazyMetadata {
        &self.metadata
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }

    pub fn file_name_is_hidden(&self) -> bool {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'))
    }
}
