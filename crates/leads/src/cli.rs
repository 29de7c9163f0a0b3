use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "leads", about = "Business leads CSV ingestion and query toolkit")]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    /// TOML defaults file; missing file means built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// File path, `.gz` file, http(s) URL, or `-` for stdin.
    pub source: Option<String>,
    #[arg(long)]
    pub delimiter: Option<char>,
}

#[derive(Args, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize a source and show the rows and located header.
    Parse {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Query {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Facets {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the full filtered and sorted view.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "csv")]
        format: String,
    },
    Run {
        #[arg(long, default_value = "leads.yaml")]
        pipeline: PathBuf,
    },
}
