//! Partition classified entries into display buckets

use crate::models::{CategorizedBatch, ClassifiedEntry, MediaKind, PlaylistStats};

/// Split a batch into live / movies / series / radio, keeping input order
/// within each bucket.
///
/// Radio entries of kind `live` go to `radio` only. Radio entries of any
/// other kind appear both in their kind's bucket and in `radio`.
pub fn categorize(entries: Vec<ClassifiedEntry>) -> CategorizedBatch {
    let mut batch = CategorizedBatch {
        total: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        match (entry.media_kind, entry.is_radio) {
            (MediaKind::Live, false) => batch.live.push(entry),
            (MediaKind::Live, true) => batch.radio.push(entry),
            (MediaKind::Movie, is_radio) => {
                if is_radio {
                    batch.radio.push(entry.clone());
                }
                batch.movies.push(entry);
            }
            (MediaKind::Series, is_radio) => {
                if is_radio {
                    batch.radio.push(entry.clone());
                }
                batch.series.push(entry);
            }
        }
    }

    batch
}

impl CategorizedBatch {
    /// Aggregate counts for the source statistics
    pub fn stats(&self) -> PlaylistStats {
        PlaylistStats {
            total_items: self.total,
            channel_count: self.live.len(),
            movie_count: self.movies.len(),
            series_count: self.series.len(),
            radio_count: self.radio.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParsedEntry, Rating};

    fn classified(name: &str, media_kind: MediaKind, is_radio: bool) -> ClassifiedEntry {
        ClassifiedEntry {
            entry: ParsedEntry {
                name: name.to_string(),
                stream_url: format!("http://s/{}", name),
                ..Default::default()
            },
            media_kind,
            is_radio,
            year: None,
            rating: Rating::General,
        }
    }

    fn names(entries: &[ClassifiedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_partition_counts() {
        let mut entries = Vec::new();
        for i in 0..3 {
            entries.push(classified(&format!("live{}", i), MediaKind::Live, false));
        }
        for i in 0..2 {
            entries.push(classified(&format!("radio{}", i), MediaKind::Live, true));
        }
        for i in 0..3 {
            entries.push(classified(&format!("movie{}", i), MediaKind::Movie, false));
        }
        for i in 0..2 {
            entries.push(classified(&format!("series{}", i), MediaKind::Series, false));
        }

        let batch = categorize(entries);
        assert_eq!(batch.live.len(), 3);
        assert_eq!(batch.radio.len(), 2);
        assert_eq!(batch.movies.len(), 3);
        assert_eq!(batch.series.len(), 2);
        assert_eq!(batch.total, 10);
        assert_eq!(
            batch.live.len() + batch.movies.len() + batch.series.len() + batch.radio.len(),
            batch.total
        );
    }

    #[test]
    fn test_partition_is_stable() {
        let batch = categorize(vec![
            classified("b", MediaKind::Live, false),
            classified("m1", MediaKind::Movie, false),
            classified("a", MediaKind::Live, false),
            classified("m2", MediaKind::Movie, false),
            classified("c", MediaKind::Live, false),
        ]);
        assert_eq!(names(&batch.live), vec!["b", "a", "c"]);
        assert_eq!(names(&batch.movies), vec!["m1", "m2"]);
    }

    #[test]
    fn test_radio_movie_in_both_buckets() {
        let batch = categorize(vec![classified("audiobook", MediaKind::Movie, true)]);
        assert_eq!(batch.movies.len(), 1);
        assert_eq!(batch.radio.len(), 1);
        assert_eq!(batch.total, 1);
    }

    #[test]
    fn test_empty_batch() {
        let batch = categorize(Vec::new());
        assert_eq!(batch.total, 0);
        assert_eq!(batch.stats(), PlaylistStats::default());
    }

    #[test]
    fn test_stats() {
        let batch = categorize(vec![
            classified("a", MediaKind::Live, false),
            classified("r", MediaKind::Live, true),
            classified("m", MediaKind::Movie, false),
            classified("s", MediaKind::Series, false),
        ]);
        let stats = batch.stats();
        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.channel_count, 1);
        assert_eq!(stats.movie_count, 1);
        assert_eq!(stats.series_count, 1);
        assert_eq!(stats.radio_count, 1);
    }
}
