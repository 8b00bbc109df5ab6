//! Sorting support for the Walker's buffered mode (§4.5, §8 property 6).
//!
//! Grounded on the teacher's `search/sorting.rs`: same comparator shape,
//! generalized to sort an arbitrary key tuple rather than `SearchResult`
//! directly, since `find` sorts [`crate::result::PathResult`] and `search`
//! sorts [`crate::result::ContentMatch`].

use std::cmp::Ordering;
use std::path::Path;

use crate::request::{SortBy, SortDirection};

/// The subset of metadata sorting needs, captured once per buffered entry
/// so sorting never re-stats the filesystem.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub path: std::path::PathBuf,
    pub size: Option<u64>,
    pub mtime: Option<i64>,
}

pub fn sort_indices(keys: &[SortKey], sort_by: SortBy, direction: SortDirection) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..keys.len()).collect();
    indices.sort_by(|&a, &b| {
        let ordering = match sort_by {
            SortBy::Name => compare_names(&keys[a].path, &keys[b].path),
            SortBy::Path => keys[a].path.cmp(&keys[b].path),
            SortBy::Size => compare_optional(keys[a].size, keys[b].size),
            SortBy::Mtime => compare_optional(keys[a].mtime, keys[b].mtime),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    indices
}

/// `sort = name` is defined by §8 property 6 as byte-lexicographic order
/// over the final path component.
fn compare_names(a: &Path, b: &Path) -> Ordering {
    let a_name = a.file_name().unwrap_or_default();
    let b_name = b.file_name().unwrap_or_default();
    a_name.cmp(b_name)
}

/// Missing values sort to the end (ascending) / beginning (descending),
/// matching the teacher's `compare_optional_times`.
fn compare_optional<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
