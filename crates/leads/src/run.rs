use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_yaml::from_str;
use tradeleads_core::{run_query, BusinessLead, IngestOptions, IngestReport};

use crate::config::{AppConfig, ExportFormat, RunConfig};
use crate::{export, ingest, query};

pub fn run_from_config(path: &Path, config: &AppConfig) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read pipeline {}", path.display()))?;
    let cfg: RunConfig = from_str(&raw).context("invalid leads pipeline")?;
    let retries = config.defaults.retries;
    run_pipeline(
        cfg,
        config,
        |source, opts| ingest::load_from(source, opts, retries),
        |target, format, view| export::write_export(Path::new(target), format, view),
    )
}

fn run_pipeline<FLoad, FExport>(
    cfg: RunConfig,
    config: &AppConfig,
    load_fn: FLoad,
    export_fn: FExport,
) -> Result<()>
where
    FLoad: Fn(&str, IngestOptions) -> Result<IngestReport>,
    FExport: Fn(&str, ExportFormat, &[&BusinessLead]) -> Result<usize>,
{
    if cfg.exports.is_empty() {
        return Err(anyhow!("pipeline must declare at least one export"));
    }
    let report = load_fn(&cfg.source, config.ingest_options(cfg.delimiter))?;
    eprintln!(
        "[leads] loaded {} leads from {} (header row {})",
        report.leads.len(),
        cfg.source,
        report.header_index
    );
    let query_args = config.with_default_sort(cfg.query.clone());
    let state = query::build_state(&query_args, config.defaults.page_size)?;
    let result = run_query(&report.leads, &state);
    for (idx, target) in cfg.exports.iter().enumerate() {
        let written = export_fn(&target.path, target.format, &result.view)
            .with_context(|| format!("export {} to {} failed", idx + 1, target.path))?;
        eprintln!("[leads] export {}: {} leads -> {}", idx + 1, written, target.path);
    }
    Ok(())
}
