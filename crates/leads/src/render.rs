use tradeleads_core::{BusinessLead, FacetCount, Facets, LeadField, QueryResult, RawRow};

const PAGE_COLUMNS: [LeadField; 5] = [
    LeadField::Name,
    LeadField::PrimaryIndustry,
    LeadField::Location,
    LeadField::Country,
    LeadField::Domain,
];

/// Renders the current page as a markdown table followed by a page footer.
pub fn render_page(result: &QueryResult<'_>) -> String {
    let mut out = String::new();
    if result.total() == 0 {
        out.push_str("(no matching leads)\n");
        return out;
    }
    let mut headers = vec!["ID".to_string()];
    headers.extend(PAGE_COLUMNS.iter().map(|field| field.label().to_string()));
    let rows: Vec<Vec<String>> = result
        .page_items()
        .iter()
        .map(|lead| lead_row(lead))
        .collect();
    render_table(&headers, &rows, &mut out);
    out.push_str(&page_footer(result));
    out.push('\n');
    out
}

pub fn page_footer(result: &QueryResult<'_>) -> String {
    format!(
        "page {} of {} ({} matches)",
        result.page,
        result.page_count.max(1),
        result.total()
    )
}

fn lead_row(lead: &BusinessLead) -> Vec<String> {
    let mut row = vec![lead.id.clone()];
    row.extend(PAGE_COLUMNS.iter().map(|field| lead.get(*field).to_string()));
    row
}

/// Renders tokenized rows with their index, marking the header row.
pub fn render_rows(rows: &[RawRow], header_index: Option<usize>) -> String {
    let mut out = String::new();
    for (idx, row) in rows.iter().enumerate() {
        let marker = if Some(idx) == header_index { "*" } else { " " };
        let cells: Vec<String> = row.iter().map(|cell| sanitize_cell(cell)).collect();
        out.push_str(&format!("{marker}{idx:>4} | {}\n", cells.join(" | ")));
    }
    match header_index {
        Some(idx) => out.push_str(&format!("header row: {idx}\n")),
        None => out.push_str("header row: not found\n"),
    }
    out
}

pub fn render_facets(facets: &Facets) -> String {
    let mut out = String::new();
    render_facet_table("Primary Industry", &facets.industries, &mut out);
    render_facet_table("Country", &facets.countries, &mut out);
    out
}

fn render_facet_table(label: &str, values: &[FacetCount], out: &mut String) {
    let headers = vec![label.to_string(), "Leads".to_string()];
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|facet| vec![facet.value.clone(), facet.count.to_string()])
        .collect();
    render_table(&headers, &rows, out);
}

fn render_table(headers: &[String], rows: &[Vec<String>], out: &mut String) {
    out.push('|');
    for header in headers {
        out.push(' ');
        out.push_str(&sanitize_cell(header));
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push('|');
    for _ in headers {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in rows {
        out.push('|');
        for cell in row {
            out.push(' ');
            out.push_str(&sanitize_cell(cell));
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }
    out.push('\n');
}

fn sanitize_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}
