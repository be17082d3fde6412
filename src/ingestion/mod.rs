//! Getting songs into the catalog.
//!
//! Two paths lead in:
//! 1. A user submits a single video URL, which is looked up, classified and
//!    stored ([`SongImporter`]).
//! 2. The `cli-ingest` binary searches a list of topics and stores every hit
//!    ([`BatchIngestor`]).

mod batch;
mod url_import;

pub use batch::{BatchIngestor, IngestionSummary, DEFAULT_MAX_RESULTS_PER_TOPIC, DEFAULT_TOPICS};
pub use url_import::{ImportError, SongImporter, VideoAnalysis};
