//! Bounded, thread-safe, process-wide compilation caches (§4.1, §4.2, §9
//! "Global caches").

pub mod pattern;
pub mod regex;

pub use pattern::PatternCache;
pub use regex::RegexCache;

/// Design-target LRU capacity shared by both caches (§3: "design target
/// 256 entries").
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

static PATTERN_CACHE: std::sync::OnceLock<PatternCache> = std::sync::OnceLock::new();
static REGEX_CACHE: std::sync::OnceLock<RegexCache> = std::sync::OnceLock::new();

/// Process-wide cache instances, lazily initialized exactly once and safe
/// to use from multiple concurrent walks (§9 "Global caches... modeled as
/// process-wide state with lazy initialization").
pub fn global_pattern_cache() -> &'static PatternCache {
    PATTERN_CACHE.get_or_init(PatternCache::new)
}

pub fn global_regex_cache() -> &'static RegexCache {
    REGEX_CACHE.get_or_init(RegexCache::new)
}
