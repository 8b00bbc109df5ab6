//! [`RegexCache`]: identical shape to [`super::PatternCache`], keyed by
//! `(regex, case_sensitive, multiline)` (§4.2).

use std::sync::Arc;

use grep::regex::{RegexMatcher, RegexMatcherBuilder};
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::PatternError;

use super::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    pattern: String,
    case_sensitive: bool,
    multiline: bool,
}

fn compile(pattern: &str, case_sensitive: bool, multiline: bool) -> Result<RegexMatcher, PatternError> {
    RegexMatcherBuilder::new()
        .case_insensitive(!case_sensitive)
        .multi_line(multiline)
        .line_terminator(Some(b'\n'))
        .build(pattern)
        .map_err(|e| PatternError { pattern: pattern.to_string(), reason: e.to_string() })
}

/// Bounded, thread-safe cache of compiled content-search regexes (§4.2).
/// Must interoperate with `grep`'s matcher type, as the `ContentSearcher`
/// consumes it directly.
pub struct RegexCache {
    entries: Mutex<LruCache<CacheKey, Arc<RegexMatcher>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                std::num::NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap(),
            )),
        }
    }

    pub fn get(
        &self,
        pattern: &str,
        case_sensitive: bool,
        multiline: bool,
    ) -> Result<Arc<RegexMatcher>, PatternError> {
        let key = CacheKey { pattern: pattern.to_string(), case_sensitive, multiline };
        if let Some(hit) = self.entries.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let compiled = Arc::new(compile(pattern, case_sensitive, multiline)?);
        self.entries.lock().put(key, Arc::clone(&compiled));
        Ok(compiled)
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}
