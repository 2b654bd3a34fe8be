//! Mapping from classified entries to catalogue records
//!
//! The catalogue needs a few fields an M3U line cannot provide (duration,
//! description), plus fallbacks for the optional attributes.

use sha1::{Digest, Sha1};

use crate::config::Config;
use crate::models::{CatalogueRecord, ClassifiedEntry, MediaKind};

const MOVIE_DURATION: &str = "2h";
const EPISODE_DURATION: &str = "50min";

/// Fallback values for entries missing optional attributes
#[derive(Debug, Clone)]
pub struct RecordDefaults {
    pub placeholder_logo: String,
    pub default_category: String,
}

impl RecordDefaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            placeholder_logo: config.placeholder_logo.clone(),
            default_category: config.default_category.clone(),
        }
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            placeholder_logo: "/placeholder.svg".to_string(),
            default_category: "Sem categoria".to_string(),
        }
    }
}

/// Generate SHA1 hash of a string for stable ids
pub fn hash_url(url: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Stable id of an entry within one source
pub fn item_hash(list_key: &str, position: usize, stream_url: &str) -> String {
    hash_url(&format!("{}:{}:{}", list_key, position, stream_url))
}

/// Build the catalogue record for one entry
pub fn to_record(
    entry: &ClassifiedEntry,
    list_key: &str,
    position: usize,
    defaults: &RecordDefaults,
) -> CatalogueRecord {
    let attributes = entry.attributes();

    let thumbnail = attributes
        .tvg_logo()
        .filter(|logo| !logo.trim().is_empty())
        .unwrap_or(defaults.placeholder_logo.as_str())
        .to_string();

    let genre = attributes
        .group_title()
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .unwrap_or(defaults.default_category.as_str())
        .to_string();

    let duration = match entry.media_kind {
        MediaKind::Movie => MOVIE_DURATION,
        MediaKind::Live | MediaKind::Series => EPISODE_DURATION,
    };

    CatalogueRecord {
        id: item_hash(list_key, position, entry.stream_url()),
        title: entry.name().to_string(),
        description: describe(entry, &genre),
        thumbnail,
        genre,
        stream_url: entry.stream_url().to_string(),
        media_kind: entry.media_kind,
        year: entry.year,
        rating: entry.rating,
        duration: duration.to_string(),
        is_radio: entry.is_radio,
    }
}

/// Build records for a whole batch, in source order
pub fn to_records(
    entries: &[ClassifiedEntry],
    list_key: &str,
    defaults: &RecordDefaults,
) -> Vec<CatalogueRecord> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| to_record(entry, list_key, position, defaults))
        .collect()
}

/// Human-readable description shown on detail screens
fn describe(entry: &ClassifiedEntry, genre: &str) -> String {
    match (entry.media_kind, entry.is_radio, entry.year) {
        (MediaKind::Live, true, _) => format!("Rádio ao vivo - {}", genre),
        (MediaKind::Live, false, _) => format!("Canal ao vivo - {}", genre),
        (MediaKind::Movie, _, Some(year)) => format!("Filme de {} da categoria {}", year, genre),
        (MediaKind::Movie, _, None) => format!("Filme da categoria {}", genre),
        (MediaKind::Series, _, _) => format!("Série da categoria {}", genre),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attributes, ParsedEntry, Rating};

    fn classified(name: &str, attrs: &[(&str, &str)], media_kind: MediaKind) -> ClassifiedEntry {
        let attributes: Attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClassifiedEntry {
            entry: ParsedEntry {
                name: name.to_string(),
                attributes,
                stream_url: "http://stream.example/a.ts".to_string(),
            },
            media_kind,
            is_radio: false,
            year: None,
            rating: Rating::General,
        }
    }

    #[test]
    fn test_hash_url() {
        let hash = hash_url("http://example.com/playlist.m3u");
        assert_eq!(hash.len(), 40); // SHA1 produces 40 hex chars
    }

    #[test]
    fn test_item_hash_depends_on_position() {
        let a = item_hash("list", 0, "http://s/a.ts");
        let b = item_hash("list", 1, "http://s/a.ts");
        let c = item_hash("other", 0, "http://s/a.ts");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, item_hash("list", 0, "http://s/a.ts"));
    }

    #[test]
    fn test_record_uses_attributes() {
        let entry = classified(
            "ESPN HD",
            &[("tvg-logo", "http://x/logo.png"), ("group-title", "Esportes")],
            MediaKind::Live,
        );
        let record = to_record(&entry, "list", 0, &RecordDefaults::default());
        assert_eq!(record.title, "ESPN HD");
        assert_eq!(record.thumbnail, "http://x/logo.png");
        assert_eq!(record.genre, "Esportes");
        assert_eq!(record.description, "Canal ao vivo - Esportes");
        assert_eq!(record.duration, "50min");
        assert_eq!(record.stream_url, "http://stream.example/a.ts");
    }

    #[test]
    fn test_record_fallbacks() {
        let entry = classified("Filme X", &[("tvg-logo", "  "), ("group-title", "")], MediaKind::Movie);
        let record = to_record(&entry, "list", 0, &RecordDefaults::default());
        assert_eq!(record.thumbnail, "/placeholder.svg");
        assert_eq!(record.genre, "Sem categoria");
        assert_eq!(record.duration, "2h");
        assert_eq!(record.description, "Filme da categoria Sem categoria");
    }

    #[test]
    fn test_record_movie_with_year() {
        let mut entry = classified("Duro de Matar (1988)", &[("group-title", "Filmes")], MediaKind::Movie);
        entry.year = Some(1988);
        let record = to_record(&entry, "list", 3, &RecordDefaults::default());
        assert_eq!(record.year, Some(1988));
        assert_eq!(record.description, "Filme de 1988 da categoria Filmes");
    }

    #[test]
    fn test_record_radio_description() {
        let mut entry = classified("Rádio Nova", &[("group-title", "Rádios")], MediaKind::Live);
        entry.is_radio = true;
        let record = to_record(&entry, "list", 0, &RecordDefaults::default());
        assert!(record.is_radio);
        assert_eq!(record.description, "Rádio ao vivo - Rádios");
    }

    #[test]
    fn test_to_records_keeps_order() {
        let entries = vec![
            classified("A", &[], MediaKind::Live),
            classified("B", &[], MediaKind::Series),
        ];
        let records = to_records(&entries, "list", &RecordDefaults::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[1].title, "B");
        assert_eq!(records[1].duration, "50min");
        assert_ne!(records[0].id, records[1].id);
    }
}
