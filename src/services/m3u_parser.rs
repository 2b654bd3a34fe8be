//! M3U playlist parser
//!
//! Turns raw playlist text into [`ParsedEntry`] values, one per media
//! reference. The parser is a single pass over the lines with one
//! in-progress slot:
//!
//! ```text
//! #EXTM3U
//! #EXTINF:-1 tvg-id="1" group-title="Esportes",ESPN HD   <- opens an entry
//! http://stream.example/espn.m3u8                        <- emits it
//! ```
//!
//! A metadata line that is followed by another metadata line (or by the
//! end of the document) never gets a URL and is dropped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PlaylistError;
use crate::models::{Attributes, ParsedEntry};

const HEADER: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";

lazy_static! {
    /// Regex to parse EXTINF attributes (tvg-id="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"(\w+(?:-\w+)*)="([^"]*)""#).unwrap();
}

const BOM: char = '\u{FEFF}';

/// Check the `#EXTM3U` header, ignoring leading whitespace and a byte-order mark
pub fn has_header(document: &str) -> bool {
    document
        .trim_start_matches(|c: char| c.is_whitespace() || c == BOM)
        .starts_with(HEADER)
}

/// Parse a whole document into entries, in source order
pub fn parse(document: &str) -> Result<Vec<ParsedEntry>, PlaylistError> {
    Ok(entries(document)?.collect())
}

/// Lazily iterate over the entries of a document
///
/// The header is validated up front; after that iteration cannot fail.
pub fn entries(document: &str) -> Result<Entries<'_>, PlaylistError> {
    if !has_header(document) {
        return Err(PlaylistError::Format);
    }

    Ok(Entries {
        lines: document.split('\n'),
        current: None,
    })
}

/// Iterator over the entries of a validated document
pub struct Entries<'a> {
    lines: std::str::Split<'a, char>,
    current: Option<ParsedEntry>,
}

impl Iterator for Entries<'_> {
    type Item = ParsedEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            let line = raw.trim();

            if line.starts_with(EXTINF) {
                // Overwrites an unfinished entry
                self.current = Some(parse_extinf(line));
                continue;
            }

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(mut entry) = self.current.take() {
                entry.stream_url = line.to_string();
                return Some(entry);
            }
        }

        None
    }
}

/// Parse an EXTINF line into an entry without a stream URL
/// Format: #EXTINF:duration tvg-id="..." tvg-logo="..." group-title="...",Title
pub fn parse_extinf(line: &str) -> ParsedEntry {
    let content = line.strip_prefix(EXTINF).unwrap_or(line);

    // Title is everything after the last comma
    let name = content
        .rfind(',')
        .map(|pos| content[pos + 1..].trim().to_string())
        .unwrap_or_default();

    let attributes: Attributes = ATTR_REGEX
        .captures_iter(content)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    ParsedEntry {
        name,
        attributes,
        stream_url: String::new(),
    }
}
