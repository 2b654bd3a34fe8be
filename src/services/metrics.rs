//! Prometheus counters for the ingestion path, exposed at `/metrics`

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

use crate::models::PlaylistStats;

lazy_static! {
    pub static ref ENTRIES_INGESTED: IntCounterVec = register_int_counter_vec!(
        "playlist_entries_ingested_total",
        "Entries written to the catalogue, by bucket",
        &["kind"]
    )
    .unwrap();
    pub static ref INGEST_FAILURES: IntCounterVec = register_int_counter_vec!(
        "playlist_ingest_failures_total",
        "Failed playlist refreshes, by reason",
        &["reason"]
    )
    .unwrap();
}

pub fn record_ingested(stats: &PlaylistStats) {
    ENTRIES_INGESTED
        .with_label_values(&["live"])
        .inc_by(stats.channel_count as u64);
    ENTRIES_INGESTED
        .with_label_values(&["movie"])
        .inc_by(stats.movie_count as u64);
    ENTRIES_INGESTED
        .with_label_values(&["series"])
        .inc_by(stats.series_count as u64);
    ENTRIES_INGESTED
        .with_label_values(&["radio"])
        .inc_by(stats.radio_count as u64);
}

pub fn record_failure(reason: &str) {
    INGEST_FAILURES.with_label_values(&[reason]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = ENTRIES_INGESTED.with_label_values(&["movie"]).get();
        record_ingested(&PlaylistStats {
            total_items: 3,
            channel_count: 1,
            movie_count: 2,
            series_count: 0,
            radio_count: 0,
        });
        assert!(ENTRIES_INGESTED.with_label_values(&["movie"]).get() >= before + 2);

        let before = INGEST_FAILURES.with_label_values(&["empty"]).get();
        record_failure("empty");
        assert!(INGEST_FAILURES.with_label_values(&["empty"]).get() >= before + 1);
    }
}
