use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Media type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Live,
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Live => "live",
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Parse a stored or query-string value; unknown values yield None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Some(MediaKind::Live),
            "movie" | "movies" => Some(MediaKind::Movie),
            "series" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content rating derived from textual cues in the title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "18")]
    Eighteen,
    #[serde(rename = "16")]
    Sixteen,
    #[serde(rename = "14")]
    Fourteen,
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "10")]
    Ten,
    /// Free / general audience
    #[default]
    #[serde(rename = "L")]
    General,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Eighteen => "18",
            Rating::Sixteen => "16",
            Rating::Fourteen => "14",
            Rating::Twelve => "12",
            Rating::Ten => "10",
            Rating::General => "L",
        }
    }

    /// Parse a stored label; anything unknown is general audience
    pub fn parse(s: &str) -> Self {
        match s {
            "18" => Rating::Eighteen,
            "16" => Rating::Sixteen,
            "14" => Rating::Fourteen,
            "12" => Rating::Twelve,
            "10" => Rating::Ten,
            _ => Rating::General,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute bag of an EXTINF line (`tvg-id="..."`, `group-title="..."`, ...)
///
/// Any key may appear; the well-known ones have dedicated accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(HashMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; a repeated key keeps the last value seen
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tvg_id(&self) -> Option<&str> {
        self.get("tvg-id")
    }

    pub fn tvg_name(&self) -> Option<&str> {
        self.get("tvg-name")
    }

    pub fn tvg_logo(&self) -> Option<&str> {
        self.get("tvg-logo")
    }

    pub fn group_title(&self) -> Option<&str> {
        self.get("group-title")
    }

    pub fn radio(&self) -> Option<&str> {
        self.get("radio")
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One media reference read from the playlist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub name: String,
    pub attributes: Attributes,
    pub stream_url: String,
}

/// Parsed entry with its content type and derived metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedEntry {
    #[serde(flatten)]
    pub entry: ParsedEntry,
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
    pub is_radio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub rating: Rating,
}

impl ClassifiedEntry {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn stream_url(&self) -> &str {
        &self.entry.stream_url
    }

    pub fn attributes(&self) -> &Attributes {
        &self.entry.attributes
    }
}

/// Classified entries split into display buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedBatch {
    pub live: Vec<ClassifiedEntry>,
    pub movies: Vec<ClassifiedEntry>,
    pub series: Vec<ClassifiedEntry>,
    pub radio: Vec<ClassifiedEntry>,
    pub total: usize,
}

/// Per-source counts shown after an ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStats {
    pub total_items: usize,
    pub channel_count: usize,
    pub movie_count: usize,
    pub series_count: usize,
    pub radio_count: usize,
}

/// Request to parse a playlist document that was already downloaded
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub content: String,
    /// Declared origin of the document, echoed back for the caller
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Parse response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub stats: PlaylistStats,
    pub live: Vec<ClassifiedEntry>,
    pub movies: Vec<ClassifiedEntry>,
    pub series: Vec<ClassifiedEntry>,
    pub radio: Vec<ClassifiedEntry>,
}
