use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ClassifiedEntry, MediaKind, ParsedEntry, Rating};

// ============ KEYWORDS ============

/// Matched against both the title and the group
const LIVE_KEYWORDS: &[&str] = &["canal", "channel", "tv", "live"];
/// Matched against the group only
const LIVE_GROUP_KEYWORDS: &[&str] = &[
    "ao vivo",
    "notícias",
    "esportes",
    "news",
    "sports",
    "entertainment",
];
const MOVIE_KEYWORDS: &[&str] = &["filme", "movie", "film"];
const SERIES_KEYWORDS: &[&str] = &["série", "serie", "season", "episódio", "episode"];

/// Rating cues in priority order; the first hit wins
const RATING_CUES: &[(&[&str], Rating)] = &[
    (&["18", "+18"], Rating::Eighteen),
    (&["16", "+16"], Rating::Sixteen),
    (&["14", "+14"], Rating::Fourteen),
    (&["12", "+12"], Rating::Twelve),
    (&["10", "+10"], Rating::Ten),
];

lazy_static! {
    /// ASCII digits and ASCII word boundaries only
    static ref EXTRACTOR_YEAR: Regex = Regex::new(r"(?-u:\b)(19|20)[0-9]{2}(?-u:\b)").unwrap();
}

/// One classification rule: a predicate over the lower-cased title and
/// group, and the kind it assigns
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: &'static str,
    pub kind: MediaKind,
    predicate: fn(&str, &str) -> bool,
}

impl Rule {
    /// Inputs must already be lower-cased
    pub fn matches(&self, name: &str, group: &str) -> bool {
        (self.predicate)(name, group)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn live_signal(name: &str, group: &str) -> bool {
    contains_any(name, LIVE_KEYWORDS)
        || contains_any(group, LIVE_KEYWORDS)
        || contains_any(group, LIVE_GROUP_KEYWORDS)
}

fn movie_signal(name: &str, group: &str) -> bool {
    contains_any(name, MOVIE_KEYWORDS) || contains_any(group, MOVIE_KEYWORDS)
}

fn series_signal(name: &str, group: &str) -> bool {
    contains_any(name, SERIES_KEYWORDS) || contains_any(group, SERIES_KEYWORDS)
}

/// Ordered rule list, evaluated top to bottom
///
/// Live comes first: playlists are mostly channel lists, so a title that
/// mentions both "tv" and "filme" is treated as a channel.
pub static RULES: [Rule; 3] = [
    Rule {
        label: "live",
        kind: MediaKind::Live,
        predicate: live_signal,
    },
    Rule {
        label: "movie",
        kind: MediaKind::Movie,
        predicate: movie_signal,
    },
    Rule {
        label: "series",
        kind: MediaKind::Series,
        predicate: series_signal,
    },
];

/// Kind assigned when no rule matches
pub const DEFAULT_KIND: MediaKind = MediaKind::Live;

/// Content classifier for IPTV entries
pub struct ContentClassifier;

impl ContentClassifier {
    /// Classify an entry and attach its derived metadata. Never fails.
    pub fn classify(entry: ParsedEntry) -> ClassifiedEntry {
        let group = entry.attributes.group_title().unwrap_or_default();
        let media_kind = Self::classify_kind(&entry.name, group);
        let is_radio = Self::is_radio(&entry);
        let year = Self::extract_year(&entry.name);
        let rating = Self::extract_rating(&entry.name);

        ClassifiedEntry {
            entry,
            media_kind,
            is_radio,
            year,
            rating,
        }
    }

    /// Classify a batch, preserving order
    pub fn classify_all(entries: Vec<ParsedEntry>) -> Vec<ClassifiedEntry> {
        entries.into_iter().map(Self::classify).collect()
    }

    /// Content type from title and group (case-insensitive)
    pub fn classify_kind(name: &str, group: &str) -> MediaKind {
        Self::matching_rule(name, group)
            .map(|rule| rule.kind)
            .unwrap_or(DEFAULT_KIND)
    }

    /// First rule that matches, if any
    pub fn matching_rule(name: &str, group: &str) -> Option<&'static Rule> {
        let name = name.to_lowercase();
        let group = group.to_lowercase();

        RULES.iter().find(|rule| rule.matches(&name, &group))
    }

    /// `radio="true"` marks audio-only streams; any other value does not
    pub fn is_radio(entry: &ParsedEntry) -> bool {
        entry.attributes.radio() == Some("true")
    }

    /// First standalone 19xx/20xx token in the title
    pub fn extract_year(name: &str) -> Option<u16> {
        EXTRACTOR_YEAR
            .find(name)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Textual rating cue in the title, "L" when absent
    pub fn extract_rating(name: &str) -> Rating {
        RATING_CUES
            .iter()
            .find(|(cues, _)| contains_any(name, cues))
            .map(|(_, rating)| *rating)
            .unwrap_or_default()
    }
}
