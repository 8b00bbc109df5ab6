//! A parallel, gitignore-aware filesystem search engine exposing two
//! streaming primitives: `find` (path enumeration) and `search`
//! (line-oriented content search). See `SPEC_FULL.md` for the full design.

pub mod cache;
pub mod content_search;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod filter;
pub mod ignore_resolver;
pub mod request;
pub mod result;
pub mod sort;
mod walker;

use std::sync::Arc;

pub use entry::{Entry, EntryKind};
pub use error::{ConfigError, CoreError, PatternError, PerEntryWarning, TraversalError};
pub use request::{CaseSensitive, FileTypeFilter, SearchRequest, SearchRequestBuilder, SortBy, SortDirection};
pub use result::{ContentMatch, FindStream, PathResult, SearchStream, WorkloadClass};

use filter::EntryFilter;

/// Streaming enumeration of paths under `request.roots` that satisfy the
/// glob and metadata predicates (§6).
///
/// Pattern/config errors are raised synchronously, before any traversal
/// work; the returned stream is otherwise lazy, and dropping it mid-walk
/// cancels the background traversal.
pub fn find(request: SearchRequest) -> Result<FindStream, CoreError> {
    request.validate()?;
    let filter = Arc::new(EntryFilter::new(&request, cache::global_pattern_cache())?);
    let threads = request.threads;
    let workload = if request.sort.is_some() {
        WorkloadClass::Sorted
    } else {
        WorkloadClass::StandardFind { threads }
    };

    let (receiver, handle) = walker::drive(request, filter, workload, |entry, _filter| {
        vec![PathResult { path: entry.path.clone() }]
    });
    Ok(FindStream::new(receiver, handle))
}

/// Streaming enumeration of regex matches within the contents of files
/// that pass the same predicates as `find` (§6).
pub fn search(request: SearchRequest) -> Result<SearchStream, CoreError> {
    request.validate()?;
    if request.content_regex.is_none() {
        return Err(ConfigError::MissingContentRegex.into());
    }
    let filter = Arc::new(EntryFilter::new(&request, cache::global_pattern_cache())?);

    let pattern = request.content_regex.clone().unwrap_or_default();
    let case_sensitive = request.case_sensitive.resolve(&pattern);
    // §3's RegexCache key is (regex, case_sensitive, multiline); this
    // crate's request surface has no multiline flag (absent from §3's
    // `SearchRequest` field table), so content search always compiles with
    // multiline = false.
    let matcher = cache::global_regex_cache().get(&pattern, case_sensitive, false)?;

    let workload = if request.sort.is_some() {
        WorkloadClass::Sorted
    } else {
        WorkloadClass::ContentSearch
    };

    let (receiver, handle) = walker::drive(request, filter, workload, move |entry, _filter| {
        if entry.kind != EntryKind::File {
            return Vec::new();
        }
        content_search::search_file(&entry.path, &matcher, false)
    });
    Ok(SearchStream::new(receiver, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn touch(path: &std::path::Path, contents: &str) {
        let mut file = fs::File::create(path).expect("create fixture file");
        write!(file, "{contents}").expect("write fixture contents");
    }

    /// S1 — literal glob + extension filter.
    #[test]
    fn s1_literal_glob_and_max_depth() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.py"), "");
        touch(&dir.path().join("b.py"), "");
        touch(&dir.path().join("c.txt"), "");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        touch(&dir.path().join("sub/d.py"), "");

        let request = SearchRequest::builder()
            .root(dir.path())
            .glob("*.py")
            .max_depth(1)
            .build();
        let mut names: Vec<String> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.py", "b.py"]);
    }

    /// S2 — recursive glob + gitignore.
    #[test]
    fn s2_recursive_glob_respects_gitignore() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("src")).expect("mkdir src");
        fs::create_dir(dir.path().join("build")).expect("mkdir build");
        touch(&dir.path().join("src/x.py"), "");
        touch(&dir.path().join("build/y.py"), "");
        touch(&dir.path().join(".gitignore"), "build/\n");

        let request = SearchRequest::builder()
            .root(dir.path())
            .glob("**/*.py")
            .respect_vcs_ignores(true)
            .build();
        let paths: Vec<_> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec![dir.path().join("src/x.py")]);
    }

    /// S4 — content search with a multi-match line.
    #[test]
    fn s4_content_search_multi_match_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.txt"), "class A: pass; class B: pass");

        let request = SearchRequest::builder()
            .root(dir.path())
            .content_regex(r"class\s+\w+")
            .build();
        let matches: Vec<_> = search(request).expect("search starts").filter_map(Result::ok).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 1);
        assert_eq!(matches[0].matches, vec!["class A", "class B"]);
    }

    /// S5 — smart case.
    #[test]
    fn s5_smart_case_matches_both_until_disambiguated() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("ReadMe.md"), "");
        touch(&dir.path().join("readme.md"), "");

        let request = SearchRequest::builder().root(dir.path()).glob("readme.md").build();
        let mut names: Vec<String> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ReadMe.md", "readme.md"]);

        let request = SearchRequest::builder().root(dir.path()).glob("ReadMe.md").build();
        let names: Vec<String> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ReadMe.md"]);
    }

    #[test]
    fn missing_root_is_a_per_root_error_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.txt"), "");

        let request = SearchRequest::builder()
            .root(dir.path().join("does-not-exist"))
            .root(dir.path())
            .glob("*")
            .build();
        let items: Vec<_> = find(request).expect("find starts").collect();
        assert!(items.iter().any(|r| r.is_err()));
        assert!(items.iter().any(|r| r.as_ref().is_ok_and(|p| p.path.ends_with("a.txt"))));
    }

    #[test]
    fn find_rejects_malformed_request_before_any_traversal() {
        let request = SearchRequest::builder().build(); // empty roots
        assert!(matches!(find(request), Err(CoreError::Config(ConfigError::EmptyRoots))));
    }

    #[test]
    fn search_without_content_regex_is_a_config_error() {
        let request = SearchRequest::builder().root(".").build();
        assert!(matches!(
            search(request),
            Err(CoreError::Config(ConfigError::MissingContentRegex))
        ));
    }

    /// S3 — size and mtime bounds.
    #[test]
    fn s3_size_bound_excludes_small_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("small.txt"), "x");
        touch(&dir.path().join("big.txt"), &"x".repeat(1000));

        let request = SearchRequest::builder()
            .root(dir.path())
            .glob("*.txt")
            .min_size(100)
            .build();
        let names: Vec<String> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["big.txt"]);
    }

    #[test]
    fn s3_mtime_after_future_excludes_every_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.txt"), "");

        let far_future = 32_503_680_000; // year 3000
        let request = SearchRequest::builder()
            .root(dir.path())
            .glob("*.txt")
            .mtime_after(far_future)
            .build();
        let results: Vec<_> = find(request).expect("find starts").collect();
        assert!(results.is_empty());
    }

    /// S6 — dropping the stream mid-walk cancels the background traversal
    /// instead of hanging or running to completion.
    #[test]
    fn s6_dropping_find_stream_cancels_without_hanging() {
        let dir = tempfile::tempdir().expect("tempdir");
        for i in 0..200 {
            touch(&dir.path().join(format!("f{i}.txt")), "");
        }
        let request = SearchRequest::builder().root(dir.path()).glob("*.txt").build();
        let mut stream = find(request).expect("find starts");
        let _first = stream.next();
        drop(stream);
    }

    /// Invariant #10 — a symlink loop never causes the walk to hang.
    #[test]
    #[cfg(unix)]
    fn symlink_loop_terminates_instead_of_hanging() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).expect("create symlink loop");

        let request = SearchRequest::builder()
            .root(dir.path())
            .glob("*")
            .follow_symlinks(true)
            .build();
        // Reaching this assertion at all, rather than hanging, is the
        // property under test.
        let results: Vec<_> = find(request).expect("find starts").collect();
        assert!(results.len() < 10_000);
    }

    /// `find` never emits the root path itself, only entries discovered
    /// underneath it.
    #[test]
    fn root_path_itself_is_never_a_result() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.txt"), "");

        let request = SearchRequest::builder().root(dir.path()).glob("*").build();
        let paths: Vec<_> = find(request)
            .expect("find starts")
            .filter_map(Result::ok)
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec![dir.path().join("a.txt")]);
    }
}
