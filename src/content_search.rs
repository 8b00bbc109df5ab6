//! [`ContentSearcher`]: line-oriented regex scanning over accepted files
//! (§4.7).
//!
//! Grounded on the `higrep` other-example file's `SearcherBuilder`/
//! `RegexMatcherBuilder` pairing, adapted to emit [`ContentMatch`] values
//! with all non-overlapping submatches per line instead of higrep's
//! terminal-output sink.

use std::io;
use std::path::{Path, PathBuf};

use grep::matcher::Matcher;
use grep::regex::RegexMatcher;
use grep::searcher::{BinaryDetection, Searcher, SearcherBuilder, Sink, SinkMatch};

use crate::result::ContentMatch;

/// Scans one accepted regular file and returns its `ContentMatch` values in
/// file order (lower line numbers first). A file that cannot be opened or
/// read is logged and skipped, not a fatal error.
pub fn search_file(path: &Path, matcher: &RegexMatcher, multiline: bool) -> Vec<ContentMatch> {
    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::quit(b'\x00'))
        .line_number(true)
        .multi_line(multiline)
        .build();

    let mut collector = MatchCollector { matcher, path: path.to_path_buf(), out: Vec::new() };
    if let Err(error) = searcher.search_path(matcher, path, &mut collector) {
        log::debug!("content search skipped {}: {error}", path.display());
    }
    collector.out
}

struct MatchCollector<'m> {
    matcher: &'m RegexMatcher,
    path: PathBuf,
    out: Vec<ContentMatch>,
}

impl Sink for MatchCollector<'_> {
    type Error = io::Error;

    fn matched(&mut self, _searcher: &Searcher, sink_match: &SinkMatch<'_>) -> Result<bool, io::Error> {
        let line_number = sink_match.line_number().unwrap_or(0);
        let line_bytes = strip_trailing_newline(sink_match.bytes());
        let matches = find_all_matches(self.matcher, line_bytes);
        if !matches.is_empty() {
            self.out.push(ContentMatch {
                path: self.path.clone(),
                line_number,
                line: String::from_utf8_lossy(line_bytes).into_owned(),
                matches,
            });
        }
        Ok(true)
    }
}

/// All non-overlapping matches on one line, in occurrence order (§4.7
/// "Matches-per-line").
fn find_all_matches(matcher: &RegexMatcher, line: &[u8]) -> Vec<String> {
    let mut matches = Vec::new();
    let mut start = 0;
    while start <= line.len() {
        let found = match matcher.find_at(line, start) {
            Ok(found) => found,
            Err(_) => break,
        };
        let Some(m) = found else { break };
        matches.push(String::from_utf8_lossy(&line[m.start()..m.end()]).into_owned());
        start = if m.end() > m.start() { m.end() } else { m.end() + 1 };
    }
    matches
}

fn strip_trailing_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}
