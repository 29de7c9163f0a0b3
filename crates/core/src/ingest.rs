use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::error::{LeadsError, Result};
use crate::header::{locate_header, HeaderRule};
use crate::lead::BusinessLead;
use crate::mapper::map_rows;
use crate::source::DocumentSource;
use crate::tokenizer::{tokenize_with, Dialect};

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub dialect: Dialect,
    pub header: HeaderRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub leads: Vec<BusinessLead>,
    pub header_index: usize,
    pub rows_scanned: usize,
    pub padded: usize,
    pub discarded: usize,
}

/// Tokenizes `text`, locates the header and maps every following row.
pub fn ingest_text(text: &str, opts: &IngestOptions) -> Result<IngestReport> {
    let rows = tokenize_with(text, &opts.dialect);
    let header_index = locate_header(&rows, &opts.header)?;
    debug!(rows = rows.len(), header_index, "located header row");
    let mapped = map_rows(&rows, header_index);
    if mapped.padded > 0 {
        debug!(rows = mapped.padded, "short rows padded with field defaults");
    }
    if mapped.discarded > 0 {
        debug!(rows = mapped.discarded, "rows without a name discarded");
    }
    Ok(IngestReport {
        leads: mapped.leads,
        header_index,
        rows_scanned: rows.len(),
        padded: mapped.padded,
        discarded: mapped.discarded,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    HeaderNotFound,
    AlreadyInFlight,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::HeaderNotFound => "header-not-found",
            FailureKind::AlreadyInFlight => "already-in-flight",
            FailureKind::Other => "other",
        }
    }

    fn classify(err: &LeadsError) -> Self {
        match err {
            err if err.is_retryable() => FailureKind::Transport,
            LeadsError::HeaderNotFound { .. } => FailureKind::HeaderNotFound,
            LeadsError::IngestionInFlight => FailureKind::AlreadyInFlight,
            _ => FailureKind::Other,
        }
    }
}

/// What a caller renders after one ingestion attempt. A failed load never
/// exposes partial data, only an explicit empty state with a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Ready(IngestReport),
    Failed { kind: FailureKind, message: String },
}

impl LoadState {
    pub fn leads(&self) -> &[BusinessLead] {
        match self {
            LoadState::Ready(report) => &report.leads,
            LoadState::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed { .. })
    }
}

/// Runs ingestions one at a time; a second trigger while one is active is
/// refused instead of racing the first.
#[derive(Debug, Default)]
pub struct Ingestor {
    opts: IngestOptions,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Ingestor {
    pub fn new(opts: IngestOptions) -> Self {
        Self {
            opts,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LeadsError::IngestionInFlight)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    pub fn ingest(&self, source: &dyn DocumentSource) -> Result<IngestReport> {
        let _guard = self.acquire()?;
        let text = source.fetch()?;
        let report = ingest_text(&text, &self.opts)?;
        info!(
            source = %source.describe(),
            leads = report.leads.len(),
            discarded = report.discarded,
            "ingestion complete"
        );
        Ok(report)
    }

    pub fn load(&self, source: &dyn DocumentSource) -> LoadState {
        match self.ingest(source) {
            Ok(report) => LoadState::Ready(report),
            Err(err) => {
                let kind = FailureKind::classify(&err);
                warn!(
                    source = %source.describe(),
                    kind = kind.as_str(),
                    "ingestion failed: {err}"
                );
                LoadState::Failed {
                    kind,
                    message: err.to_string(),
                }
            }
        }
    }

    /// Re-triggers a failed load up to `attempts` times in total. Only
    /// retryable failures (`FailureKind::Transport`) are retried; a missing
    /// header or undecodable input will not change.
    pub fn load_with_retry(&self, source: &dyn DocumentSource, attempts: usize) -> LoadState {
        let attempts = attempts.max(1);
        let mut state = self.load(source);
        for attempt in 2..=attempts {
            let retryable = matches!(
                state,
                LoadState::Failed {
                    kind: FailureKind::Transport,
                    ..
                }
            );
            if !retryable {
                break;
            }
            debug!(attempt, "retrying ingestion");
            state = self.load(source);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FileSource, StaticSource};
    use std::cell::Cell;
    use std::io::{self, Write};

    const SAMPLE: &str = "Export Date: 2024-01-01\n\
Name,Description,Primary Industry,Location,Country,Domain,LinkedIn\n\
Acme,Widgets,Manufacturing,NY,US,acme.com,linkedin.com/acme\n\
,orphan row\n\
Beta,Short row\n";

    struct FlakySource {
        failures_left: Cell<usize>,
        calls: Cell<usize>,
    }

    impl DocumentSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn fetch(&self) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(LeadsError::transport("flaky", "connection reset"));
            }
            Ok(SAMPLE.to_string())
        }
    }

    struct ReentrantSource<'a> {
        ingestor: &'a Ingestor,
    }

    impl DocumentSource for ReentrantSource<'_> {
        fn describe(&self) -> String {
            "reentrant".to_string()
        }

        fn fetch(&self) -> Result<String> {
            let inner = StaticSource::new("inner", SAMPLE);
            match self.ingestor.ingest(&inner) {
                Err(LeadsError::IngestionInFlight) => Ok(SAMPLE.to_string()),
                other => Err(LeadsError::Other(format!("guard not held: {other:?}"))),
            }
        }
    }

    #[test]
    fn latin1_file_still_loads_every_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Name,Description\nAcme,Widgets\nSoci\xE9te,Foods\n")
            .unwrap();
        let state = Ingestor::default().load(&FileSource::new(file.path()));
        assert_eq!(state.leads().len(), 2);
        assert_eq!(state.leads()[1].name, "Soci\u{FFFD}te");
    }

    #[test]
    fn undecodable_input_is_not_retried() {
        struct Corrupt(Cell<usize>);
        impl DocumentSource for Corrupt {
            fn describe(&self) -> String {
                "corrupt".to_string()
            }
            fn fetch(&self) -> Result<String> {
                self.0.set(self.0.get() + 1);
                Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt gzip stream").into())
            }
        }
        let source = Corrupt(Cell::new(0));
        let state = Ingestor::default().load_with_retry(&source, 3);
        assert!(matches!(
            state,
            LoadState::Failed {
                kind: FailureKind::Other,
                ..
            }
        ));
        assert_eq!(source.0.get(), 1);
    }

    #[test]
    fn ingest_text_reports_counts() {
        let report = ingest_text(SAMPLE, &IngestOptions::default()).unwrap();
        assert_eq!(report.header_index, 1);
        assert_eq!(report.rows_scanned, 5);
        assert_eq!(report.leads.len(), 2);
        assert_eq!(report.discarded, 1);
        assert_eq!(report.padded, 1);
        assert_eq!(report.leads[1].country, "Unknown");
    }

    #[test]
    fn missing_header_fails_the_load_with_empty_leads() {
        let ingestor = Ingestor::default();
        let state = ingestor.load(&StaticSource::new("bad", "foo,bar\n1,2"));
        assert!(state.is_failed());
        assert!(state.leads().is_empty());
        assert!(matches!(
            state,
            LoadState::Failed {
                kind: FailureKind::HeaderNotFound,
                ..
            }
        ));
    }

    #[test]
    fn header_only_input_is_ready_with_zero_leads() {
        let ingestor = Ingestor::default();
        let state = ingestor.load(&StaticSource::new("empty", "Name,Description\n"));
        assert!(!state.is_failed());
        assert!(state.leads().is_empty());
    }

    #[test]
    fn guard_refuses_a_second_concurrent_ingestion() {
        let ingestor = Ingestor::default();
        let outer = ReentrantSource {
            ingestor: &ingestor,
        };
        let report = ingestor.ingest(&outer).unwrap();
        assert_eq!(report.leads.len(), 2);
        assert!(!ingestor.is_in_flight());
    }

    #[test]
    fn guard_is_released_after_failure() {
        let ingestor = Ingestor::default();
        assert!(ingestor.ingest(&StaticSource::new("bad", "nothing")).is_err());
        assert!(!ingestor.is_in_flight());
        assert!(ingestor.ingest(&StaticSource::new("good", SAMPLE)).is_ok());
    }

    #[test]
    fn retries_transport_failures() {
        let ingestor = Ingestor::default();
        let source = FlakySource {
            failures_left: Cell::new(2),
            calls: Cell::new(0),
        };
        let state = ingestor.load_with_retry(&source, 3);
        assert!(!state.is_failed());
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn gives_up_after_the_attempt_budget() {
        let ingestor = Ingestor::default();
        let source = FlakySource {
            failures_left: Cell::new(5),
            calls: Cell::new(0),
        };
        let state = ingestor.load_with_retry(&source, 2);
        assert!(matches!(
            state,
            LoadState::Failed {
                kind: FailureKind::Transport,
                ..
            }
        ));
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn header_failures_are_not_retried() {
        let ingestor = Ingestor::default();
        let state = ingestor.load_with_retry(&StaticSource::new("bad", "x,y"), 5);
        assert!(matches!(
            state,
            LoadState::Failed {
                kind: FailureKind::HeaderNotFound,
                ..
            }
        ));
    }
}
