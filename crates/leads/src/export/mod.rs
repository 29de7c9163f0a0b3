use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tradeleads_core::{
    export_csv, export_jsonl, run_query, BusinessLead, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME,
};

use crate::cli::{QueryArgs, SourceArgs};
use crate::config::{AppConfig, ExportFormat};
use crate::{ingest, query};

pub fn run(
    source: SourceArgs,
    query_args: QueryArgs,
    out: Option<PathBuf>,
    format: &str,
    config: &AppConfig,
) -> Result<()> {
    let format = ExportFormat::parse(format)?;
    let out = out.unwrap_or_else(|| default_output(format));
    let report = ingest::load(&source, config)?;
    let query_args = config.with_default_sort(query_args);
    let state = query::build_state(&query_args, config.defaults.page_size)?;
    let result = run_query(&report.leads, &state);
    let written = write_export(&out, format, &result.view)?;
    println!("[leads] exported {} leads to {}", written, out.display());
    Ok(())
}

pub fn default_output(format: ExportFormat) -> PathBuf {
    match format {
        ExportFormat::Csv => PathBuf::from(EXPORT_FILE_NAME),
        ExportFormat::Jsonl => Path::new(EXPORT_FILE_NAME).with_extension("jsonl"),
    }
}

/// Writes the whole view, not just one page, and returns the lead count.
pub fn write_export(path: &Path, format: ExportFormat, view: &[&BusinessLead]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    match format {
        ExportFormat::Csv => {
            let text = export_csv(view.iter().copied())?;
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(content_type = EXPORT_CONTENT_TYPE, path = %path.display(), "csv export written");
            Ok(view.len())
        }
        ExportFormat::Jsonl => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(export_jsonl(BufWriter::new(file), view.iter().copied())?)
        }
    }
}
