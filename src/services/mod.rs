pub mod catalogue;
pub mod catalogue_store;
pub mod categorizer;
pub mod classifier;
pub mod fetcher;
pub mod ingest;
pub mod m3u_parser;
pub mod metrics;
