use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{LeadsError, Result};
use crate::lead::BusinessLead;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// `"all"` in any case, or an empty value, is the no-constraint sentinel.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(trimmed.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(expected) => expected == value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Exact(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ingestion order.
    #[default]
    Default,
    NameAsc,
    NameDesc,
    Industry,
    Country,
    Location,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::NameAsc => "name",
            SortKey::NameDesc => "name-desc",
            SortKey::Industry => "industry",
            SortKey::Country => "country",
            SortKey::Location => "location",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "default" | "none" => Ok(SortKey::Default),
            "name" | "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            "industry" => Ok(SortKey::Industry),
            "country" => Ok(SortKey::Country),
            "location" => Ok(SortKey::Location),
            other => Err(LeadsError::InvalidQuery(format!("unknown sort key: {other}"))),
        }
    }

    fn apply(&self, view: &mut [&BusinessLead]) {
        match self {
            SortKey::Default => {}
            SortKey::NameAsc => view.sort_by_cached_key(|lead| collation_key(&lead.name)),
            SortKey::NameDesc => view.sort_by_cached_key(|lead| Reverse(collation_key(&lead.name))),
            SortKey::Industry => view.sort_by_cached_key(|lead| {
                (collation_key(&lead.primary_industry), collation_key(&lead.name))
            }),
            SortKey::Country => view
                .sort_by_cached_key(|lead| (collation_key(&lead.country), collation_key(&lead.name))),
            SortKey::Location => view
                .sort_by_cached_key(|lead| (collation_key(&lead.location), collation_key(&lead.name))),
        }
    }
}

/// Ordering key approximating locale-aware comparison: compatibility-folded,
/// case-insensitive first, raw value as the tie-break.
pub fn collation_key(value: &str) -> (String, String) {
    let folded: String = value.nfkc().collect::<String>().to_lowercase();
    (folded, value.to_string())
}

/// User-driven view state. Changing the search term, a filter or the sort
/// key sends the view back to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search: String,
    industry: CategoryFilter,
    country: CategoryFilter,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            industry: CategoryFilter::All,
            country: CategoryFilter::All,
            sort: SortKey::Default,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn industry(&self) -> &CategoryFilter {
        &self.industry
    }

    pub fn country(&self) -> &CategoryFilter {
        &self.country
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn set_industry(&mut self, filter: CategoryFilter) {
        self.industry = filter;
        self.page = 1;
    }

    pub fn set_country(&mut self, filter: CategoryFilter) {
        self.country = filter;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Out-of-range pages are accepted here and clamped by [`run_query`].
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.set_search(term);
        self
    }

    pub fn with_industry(mut self, filter: CategoryFilter) -> Self {
        self.set_industry(filter);
        self
    }

    pub fn with_country(mut self, filter: CategoryFilter) -> Self {
        self.set_country(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.set_sort(sort);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    fn matches(&self, lead: &BusinessLead, needle: &str) -> bool {
        self.industry.matches(&lead.primary_industry)
            && self.country.matches(&lead.country)
            && matches_search(lead, needle)
    }
}

fn matches_search(lead: &BusinessLead, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &lead.name,
        &lead.description,
        &lead.primary_industry,
        &lead.location,
        &lead.country,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub view: Vec<&'a BusinessLead>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
}

impl<'a> QueryResult<'a> {
    pub fn total(&self) -> usize {
        self.view.len()
    }

    pub fn page_items(&self) -> &[&'a BusinessLead] {
        let start = (self.page.saturating_sub(1) * self.page_size).min(self.view.len());
        let end = (start + self.page_size).min(self.view.len());
        &self.view[start..end]
    }
}

/// Recomputes the filtered, sorted view from scratch and clamps the
/// requested page into range.
pub fn run_query<'a>(leads: &'a [BusinessLead], state: &QueryState) -> QueryResult<'a> {
    let needle = state.search.to_lowercase();
    let mut view: Vec<&BusinessLead> = leads
        .iter()
        .filter(|lead| state.matches(lead, &needle))
        .collect();
    state.sort.apply(&mut view);
    let page_size = state.page_size.max(1);
    let page_count = view.len().div_ceil(page_size);
    let page = state.page.clamp(1, page_count.max(1));
    QueryResult {
        view,
        page,
        page_count,
        page_size,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub industries: Vec<FacetCount>,
    pub countries: Vec<FacetCount>,
}

/// Distinct industry and country values, for populating filter choices.
pub fn facets(leads: &[BusinessLead]) -> Facets {
    Facets {
        industries: count_values(leads.iter().map(|lead| lead.primary_industry.as_str())),
        countries: count_values(leads.iter().map(|lead| lead.country.as_str())),
    }
}

fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect();
    out.sort_by_cached_key(|facet| collation_key(&facet.value));
    out
}
