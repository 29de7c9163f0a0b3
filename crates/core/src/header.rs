use serde::Deserialize;

use crate::error::{LeadsError, Result};
use crate::tokenizer::RawRow;

/// Content heuristic used to find the column-label row. Exports often carry
/// title or metadata rows above the real header, so the header is never
/// assumed to be row 0.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderRule {
    pub first_marker: String,
    pub second_marker: String,
    pub min_columns: usize,
}

impl Default for HeaderRule {
    fn default() -> Self {
        Self {
            first_marker: "name".to_string(),
            second_marker: "description".to_string(),
            min_columns: 2,
        }
    }
}

impl HeaderRule {
    pub fn matches(&self, row: &[String]) -> bool {
        if row.len() < self.min_columns.max(2) {
            return false;
        }
        contains_marker(&row[0], &self.first_marker) && contains_marker(&row[1], &self.second_marker)
    }
}

fn contains_marker(cell: &str, marker: &str) -> bool {
    cell.to_lowercase().contains(&marker.to_lowercase())
}

/// Returns the index of the first row accepted by `rule`.
pub fn locate_header(rows: &[RawRow], rule: &HeaderRule) -> Result<usize> {
    rows.iter()
        .position(|row| rule.matches(row))
        .ok_or(LeadsError::HeaderNotFound {
            scanned: rows.len(),
        })
}
