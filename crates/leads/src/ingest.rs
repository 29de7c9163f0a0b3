use anyhow::{bail, Context, Result};
use tradeleads_core::{open_source, IngestOptions, IngestReport, Ingestor, LoadState};

use crate::cli::SourceArgs;
use crate::config::AppConfig;

/// Resolves the source, ingests it with the configured retry budget and
/// turns a failed load into the user-facing empty-state error.
pub fn load(args: &SourceArgs, config: &AppConfig) -> Result<IngestReport> {
    let source = config.resolve_source(args.source.as_deref())?;
    load_from(&source, config.ingest_options(args.delimiter), config.defaults.retries)
}

pub fn load_from(source: &str, opts: IngestOptions, retries: usize) -> Result<IngestReport> {
    let document = open_source(source).with_context(|| format!("failed to open {source}"))?;
    let ingestor = Ingestor::new(opts);
    into_report(ingestor.load_with_retry(document.as_ref(), retries))
}

fn into_report(state: LoadState) -> Result<IngestReport> {
    match state {
        LoadState::Ready(report) => {
            tracing::debug!(
                header_index = report.header_index,
                rows = report.rows_scanned,
                padded = report.padded,
                discarded = report.discarded,
                "leads loaded"
            );
            Ok(report)
        }
        LoadState::Failed { kind, message } => bail!(
            "no leads available ({}): {}; re-run the command to retry",
            kind.as_str(),
            message
        ),
    }
}
