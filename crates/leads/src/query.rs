use anyhow::Result;
use serde::Serialize;
use tradeleads_core::{
    facets, locate_header, open_source, run_query, tokenize_with, BusinessLead, CategoryFilter,
    Facets, QueryState, SortKey,
};

use crate::cli::{QueryArgs, SourceArgs};
use crate::config::AppConfig;
use crate::{ingest, render};

pub fn build_state(args: &QueryArgs, page_size: usize) -> Result<QueryState> {
    let sort = match args.sort.as_deref() {
        Some(raw) => SortKey::parse(raw)?,
        None => SortKey::Default,
    };
    let mut state = QueryState::new(page_size)
        .with_industry(CategoryFilter::parse(args.industry.as_deref().unwrap_or("all")))
        .with_country(CategoryFilter::parse(args.country.as_deref().unwrap_or("all")))
        .with_sort(sort);
    if let Some(term) = &args.search {
        state.set_search(term.clone());
    }
    Ok(state)
}

#[derive(Serialize)]
struct PagePayload<'a> {
    page: usize,
    page_count: usize,
    page_size: usize,
    total: usize,
    leads: &'a [&'a BusinessLead],
}

pub fn run(
    source: SourceArgs,
    query: QueryArgs,
    page: usize,
    page_size: Option<usize>,
    json: bool,
    config: &AppConfig,
) -> Result<()> {
    let report = ingest::load(&source, config)?;
    let query = config.with_default_sort(query);
    let state = build_state(&query, page_size.unwrap_or(config.defaults.page_size))?
        .with_page(page);
    let result = run_query(&report.leads, &state);
    if json {
        let payload = PagePayload {
            page: result.page,
            page_count: result.page_count,
            page_size: result.page_size,
            total: result.total(),
            leads: result.page_items(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render::render_page(&result));
    }
    Ok(())
}

pub fn run_facets(source: SourceArgs, json: bool, config: &AppConfig) -> Result<()> {
    let report = ingest::load(&source, config)?;
    let facets: Facets = facets(&report.leads);
    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
    } else {
        print!("{}", render::render_facets(&facets));
    }
    Ok(())
}

#[derive(Serialize)]
struct ParsePayload<'a> {
    header_index: Option<usize>,
    rows: &'a [Vec<String>],
}

/// Shows the raw tokenizer output; a missing header is reported, not fatal.
pub fn run_parse(source: SourceArgs, json: bool, config: &AppConfig) -> Result<()> {
    let location = config.resolve_source(source.source.as_deref())?;
    let document = open_source(&location)?;
    let text = document.fetch()?;
    let opts = config.ingest_options(source.delimiter);
    let rows = tokenize_with(&text, &opts.dialect);
    let header_index = locate_header(&rows, &opts.header).ok();
    if json {
        let payload = ParsePayload {
            header_index,
            rows: &rows,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render::render_rows(&rows, header_index));
    }
    Ok(())
}
