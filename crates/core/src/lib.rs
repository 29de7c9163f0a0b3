mod error;
mod export;
mod header;
mod ingest;
mod lead;
mod mapper;
mod query;
mod source;
mod tokenizer;

pub use error::{LeadsError, Result};
pub use export::{
    export_csv, export_jsonl, JsonlWriter, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
};
pub use header::{locate_header, HeaderRule};
pub use ingest::{ingest_text, FailureKind, IngestOptions, IngestReport, Ingestor, LoadState};
pub use lead::{lead_id, BusinessLead, LeadField};
pub use mapper::{map_rows, MappedRows};
pub use query::{
    collation_key, facets, run_query, CategoryFilter, FacetCount, Facets, QueryResult,
    QueryState, SortKey, DEFAULT_PAGE_SIZE,
};
pub use source::{open_source, DocumentSource, FileSource, HttpSource, StaticSource};
pub use tokenizer::{tokenize, tokenize_with, Dialect, RawRow};
