//! [`PatternCache`]: compiles glob patterns on demand, serves repeats from a
//! bounded LRU (§4.1).

use std::path::Path;
use std::sync::Arc;

use globset::GlobBuilder;
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::PatternError;

use super::DEFAULT_CACHE_CAPACITY;

/// Extensions pre-seeded at `PatternCache::new()` so the first request for
/// them never pays compilation cost (§4.1 eviction policy).
const PRESEEDED_EXTENSION_GLOBS: &[&str] = &[
    "*.rs", "*.py", "*.js", "*.ts", "*.go", "*.md", "*.json", "*.toml", "*.txt", "*.c", "*.h",
    "*.cpp", "*.java", "*.rb",
];

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    pattern: String,
    case_sensitive: bool,
}

/// A compiled pattern matcher, safe to share across threads (§4.1).
///
/// A pattern with no glob metacharacters is compiled as a literal byte
/// compare against the entry's final path component rather than a general
/// glob engine — the correctness-preserving optimization §4.1 requires.
#[derive(Debug)]
pub enum CompiledPattern {
    Literal { text: String, case_sensitive: bool },
    Glob(globset::GlobMatcher),
}

impl CompiledPattern {
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            CompiledPattern::Literal { text, case_sensitive } => {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    return false;
                };
                if *case_sensitive {
                    name == text
                } else {
                    name.eq_ignore_ascii_case(text)
                }
            }
            CompiledPattern::Glob(matcher) => matcher.is_match(path),
        }
    }
}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?', '[', ']', '{', '}'])
}

fn compile(pattern: &str, case_sensitive: bool) -> Result<CompiledPattern, PatternError> {
    if pattern == "*" {
        // match-any (§3 "glob: ... `*` means match-any")
        return Ok(CompiledPattern::Glob(
            GlobBuilder::new("*")
                .literal_separator(false)
                .build()
                .map_err(|e| PatternError { pattern: pattern.to_string(), reason: e.to_string() })?
                .compile_matcher(),
        ));
    }
    if is_literal(pattern) {
        return Ok(CompiledPattern::Literal { text: pattern.to_string(), case_sensitive });
    }
    let glob = GlobBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .literal_separator(true)
        .build()
        .map_err(|e| PatternError { pattern: pattern.to_string(), reason: e.to_string() })?;
    Ok(CompiledPattern::Glob(glob.compile_matcher()))
}

/// Bounded, thread-safe cache of compiled glob matchers (§4.1, §9 "Global
/// caches... must be safe to instantiate exactly once per process").
pub struct PatternCache {
    entries: Mutex<LruCache<CacheKey, Arc<CompiledPattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        let cache = Self {
            entries: Mutex::new(LruCache::new(
                std::num::NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap(),
            )),
        };
        for glob in PRESEEDED_EXTENSION_GLOBS {
            let _ = cache.get(glob, true);
            let _ = cache.get(glob, false);
        }
        cache
    }

    /// Never fails for a syntactically valid glob; fails with
    /// `PatternError` for invalid input. The cache is never poisoned by a
    /// failed compilation.
    pub fn get(&self, pattern: &str, case_sensitive: bool) -> Result<Arc<CompiledPattern>, PatternError> {
        let key = CacheKey { pattern: pattern.to_string(), case_sensitive };
        if let Some(hit) = self.entries.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let compiled = Arc::new(compile(pattern, case_sensitive)?);
        self.entries.lock().put(key, Arc::clone(&compiled));
        Ok(compiled)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_uses_byte_compare() {
        let cache = PatternCache::new();
        let matcher = cache.get("main.rs", true).expect("literal compiles");
        assert!(matches!(*matcher, CompiledPattern::Literal { .. }));
        assert!(matcher.matches(Path::new("src/main.rs")));
        assert!(!matcher.matches(Path::new("src/other.rs")));
    }

    #[test]
    fn glob_pattern_matches_extension() {
        let cache = PatternCache::new();
        let matcher = cache.get("*.py", true).expect("glob compiles");
        assert!(matcher.matches(Path::new("a.py")));
        assert!(!matcher.matches(Path::new("a.txt")));
    }

    #[test]
    fn recursive_glob_matches_nested_paths() {
        let cache = PatternCache::new();
        let matcher = cache.get("**/*.py", true).expect("recursive glob compiles");
        assert!(matcher.matches(Path::new("src/x.py")));
        assert!(matcher.matches(Path::new("x.py")));
    }

    #[test]
    fn invalid_glob_returns_pattern_error_without_poisoning_cache() {
        let cache = PatternCache::new();
        assert!(cache.get("[invalid", true).is_err());
        // cache still usable afterward
        assert!(cache.get("*.py", true).is_ok());
    }

    #[test]
    fn repeated_compilation_is_idempotent() {
        let cache = PatternCache::new();
        let first = cache.get("*.rs", true).expect("first compile");
        let second = cache.get("*.rs", true).expect("second compile (cached)");
        assert_eq!(first.matches(Path::new("a.rs")), second.matches(Path::new("a.rs")));
    }

    #[test]
    fn case_insensitive_glob_matches_regardless_of_case() {
        let cache = PatternCache::new();
        let matcher = cache.get("readme.md", false).expect("literal compiles");
        assert!(matcher.matches(Path::new("ReadMe.md")));
        assert!(matcher.matches(Path::new("readme.md")));
    }
}
