mod cli;
mod config;
mod export;
mod ingest;
mod logging;
mod query;
mod render;
mod run;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::{load_config, DEFAULT_CONFIG};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose || logging::env_flag();
    logging::init(verbose);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG).to_path_buf());
    let config = load_config(&config_path)?.apply_env();
    match cli.command {
        Command::Parse { source, json } => query::run_parse(source, json, &config),
        Command::Query {
            source,
            query,
            page,
            page_size,
            json,
        } => query::run(source, query, page, page_size, json, &config),
        Command::Facets { source, json } => query::run_facets(source, json, &config),
        Command::Export {
            source,
            query,
            out,
            format,
        } => export::run(source, query, out, &format, &config),
        Command::Run { pipeline } => run::run_from_config(&pipeline, &config),
    }
}
