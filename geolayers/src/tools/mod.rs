pub mod ingest;
pub mod probe;
