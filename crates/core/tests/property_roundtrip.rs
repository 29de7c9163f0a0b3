use proptest::prelude::*;
use tradeleads_core::{
    export_csv, ingest_text, run_query, tokenize, BusinessLead, IngestOptions, QueryState,
};

proptest! {
    #[test]
    fn export_parse_roundtrip(values in lead_values()) {
        let leads: Vec<BusinessLead> = values
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| BusinessLead::from_values(idx + 1, row.as_slice()))
            .collect();
        let text = export_csv(&leads).expect("export");
        let report = ingest_text(&text, &IngestOptions::default()).expect("ingest");
        prop_assert_eq!(report.leads.len(), leads.len());
        for (original, parsed) in leads.iter().zip(&report.leads) {
            prop_assert_eq!(original.values(), parsed.values());
        }
    }

    #[test]
    fn ingestion_yields_at_most_n_records(values in lead_values()) {
        let mut text = String::from("Name,Description\n");
        let mut named = 0usize;
        for row in &values {
            if !row[0].trim().is_empty() {
                named += 1;
            }
            let quoted: Vec<String> = row
                .iter()
                .map(|value| format!("\"{}\"", value.replace('"', "\"\"")))
                .collect();
            text.push_str(&quoted.join(","));
            text.push('\n');
        }
        let report = ingest_text(&text, &IngestOptions::default()).expect("ingest");
        prop_assert!(report.leads.len() <= values.len());
        prop_assert_eq!(report.leads.len(), named);
        prop_assert_eq!(report.discarded, values.len() - named);
    }

    #[test]
    fn pagination_covers_the_view(count in 0usize..120, page_size in 1usize..30, page in 0usize..12) {
        let leads: Vec<BusinessLead> = (1..=count)
            .map(|n| BusinessLead::from_values(n, &[format!("Lead {n}")]).expect("named"))
            .collect();
        let state = QueryState::new(page_size).with_page(page);
        let result = run_query(&leads, &state);
        let expected_pages = count.div_ceil(page_size);
        prop_assert_eq!(result.page_count, expected_pages);
        prop_assert!(result.page >= 1);
        prop_assert!(result.page <= expected_pages.max(1));
        if count > 0 {
            let items = result.page_items().len();
            prop_assert!(items >= 1 && items <= page_size);
        }
    }

    #[test]
    fn quoted_fields_tokenize_back(fields in prop::collection::vec(field_value(), 1..8)) {
        let line: Vec<String> = fields
            .iter()
            .map(|value| format!("\"{}\"", value.replace('"', "\"\"")))
            .collect();
        let rows = tokenize(&line.join(","));
        prop_assert_eq!(rows.len(), 1);
        prop_assert_eq!(&rows[0], &fields);
    }
}

#[test]
fn all_filters_return_input_order() {
    let leads: Vec<BusinessLead> = ["Zeta", "Alpha", "Mid"]
        .iter()
        .enumerate()
        .map(|(idx, name)| BusinessLead::from_values(idx + 1, &[*name]).expect("named"))
        .collect();
    let result = run_query(&leads, &QueryState::default());
    let view: Vec<&BusinessLead> = leads.iter().collect();
    assert_eq!(result.view, view);
}

// Values are trimmed on ingestion, so generated values never carry edge
// whitespace.
fn field_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9\",\n.&'-]{0,12}"
        .prop_map(|s| s.trim().to_string())
}

fn lead_values() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(field_value(), 7), 0..25)
}
