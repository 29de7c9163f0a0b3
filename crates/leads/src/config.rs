use std::env;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tradeleads_core::{Dialect, HeaderRule, IngestOptions, DEFAULT_PAGE_SIZE};

use crate::cli::QueryArgs;

pub const DEFAULT_CONFIG: &str = "leads.toml";
pub const DEFAULT_RETRIES: usize = 1;

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub header: HeaderRule,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub source: Option<String>,
    pub page_size: usize,
    pub sort: Option<String>,
    pub retries: usize,
    pub delimiter: Option<char>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            source: None,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            retries: DEFAULT_RETRIES,
            delimiter: None,
        }
    }
}

impl AppConfig {
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("LEADS_SOURCE").filter(|v| !v.trim().is_empty()) {
            self.defaults.source = Some(source);
        }
        if let Some(page_size) = lookup("LEADS_PAGE_SIZE").and_then(|v| v.trim().parse().ok()) {
            self.defaults.page_size = page_size;
        }
        if let Some(retries) = lookup("LEADS_RETRIES").and_then(|v| v.trim().parse().ok()) {
            self.defaults.retries = retries;
        }
        self
    }

    pub fn ingest_options(&self, delimiter: Option<char>) -> IngestOptions {
        let dialect = match delimiter.or(self.defaults.delimiter) {
            Some(delimiter) => Dialect::with_delimiter(delimiter),
            None => Dialect::default(),
        };
        IngestOptions {
            dialect,
            header: self.header.clone(),
        }
    }

    pub fn resolve_source(&self, arg: Option<&str>) -> Result<String> {
        arg.map(str::to_string)
            .or_else(|| self.defaults.source.clone())
            .ok_or_else(|| {
                anyhow!("no source given; pass one or set LEADS_SOURCE / [defaults].source")
            })
    }

    /// Fills the sort key from the defaults when the caller did not pick one.
    pub fn with_default_sort(&self, mut query: QueryArgs) -> QueryArgs {
        if query.sort.is_none() {
            query.sort = self.defaults.sort.clone();
        }
        query
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).map_err(|e| anyhow!("invalid config: {e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Jsonl,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "jsonl" | "ndjson" => Ok(ExportFormat::Jsonl),
            other => bail!("unsupported export format: {other}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportTarget {
    pub path: String,
    #[serde(default)]
    pub format: ExportFormat,
}

/// YAML pipeline description for `leads run`.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub source: String,
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub query: QueryArgs,
    #[serde(default)]
    pub exports: Vec<ExportTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn missing_config_file_means_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.defaults.retries, DEFAULT_RETRIES);
        assert_eq!(cfg.header, HeaderRule::default());
    }

    #[test]
    fn reads_defaults_and_header_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leads.toml");
        fs::write(
            &path,
            "[defaults]\nsource = \"data/leads.csv\"\npage_size = 50\nsort = \"name\"\n\n[header]\nfirst_marker = \"company\"\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.defaults.source.as_deref(), Some("data/leads.csv"));
        assert_eq!(cfg.defaults.page_size, 50);
        assert_eq!(cfg.defaults.retries, DEFAULT_RETRIES);
        assert_eq!(cfg.header.first_marker, "company");
        assert_eq!(cfg.header.second_marker, "description");
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leads.toml");
        fs::write(&path, "[defaults\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            ("LEADS_SOURCE", "https://example.com/leads.csv"),
            ("LEADS_PAGE_SIZE", "5"),
            ("LEADS_RETRIES", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::default().apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.defaults.source.as_deref(), Some("https://example.com/leads.csv"));
        assert_eq!(cfg.defaults.page_size, 5);
        assert_eq!(cfg.defaults.retries, DEFAULT_RETRIES);
    }

    #[test]
    fn source_argument_wins_over_defaults() {
        let mut cfg = AppConfig::default();
        assert!(cfg.resolve_source(None).is_err());
        cfg.defaults.source = Some("fallback.csv".to_string());
        assert_eq!(cfg.resolve_source(None).unwrap(), "fallback.csv");
        assert_eq!(cfg.resolve_source(Some("given.csv")).unwrap(), "given.csv");
    }

    #[test]
    fn delimiter_argument_overrides_config() {
        let mut cfg = AppConfig::default();
        cfg.defaults.delimiter = Some(';');
        assert_eq!(cfg.ingest_options(None).dialect.delimiter, ';');
        assert_eq!(cfg.ingest_options(Some('\t')).dialect.delimiter, '\t');
    }

    #[test]
    fn parses_run_config_yaml() {
        let yaml = "source: leads.csv\nquery:\n  search: acme\n  country: US\nexports:\n  - path: out.csv\n  - path: out.jsonl\n    format: jsonl\n";
        let cfg: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.source, "leads.csv");
        assert_eq!(cfg.query.search.as_deref(), Some("acme"));
        assert_eq!(cfg.exports.len(), 2);
        assert_eq!(cfg.exports[0].format, ExportFormat::Csv);
        assert_eq!(cfg.exports[1].format, ExportFormat::Jsonl);
    }

    #[test]
    fn parses_export_formats() {
        assert_eq!(ExportFormat::parse("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("ndjson").unwrap(), ExportFormat::Jsonl);
        assert!(ExportFormat::parse("xlsx").is_err());
    }
}
