use crate::lead::{BusinessLead, LeadField};
use crate::tokenizer::RawRow;

/// Leads mapped from the rows below a header, plus counters for the rows
/// that needed defaulting or were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRows {
    pub leads: Vec<BusinessLead>,
    pub padded: usize,
    pub discarded: usize,
}

/// Maps every row strictly after `header_index` into a lead. Rows shorter
/// than the schema are padded with field defaults; rows without a name are
/// discarded. Identifiers follow the order of surviving rows.
pub fn map_rows(rows: &[RawRow], header_index: usize) -> MappedRows {
    let mut mapped = MappedRows::default();
    let start = header_index.saturating_add(1);
    for row in rows.iter().skip(start) {
        let ordinal = mapped.leads.len() + 1;
        match BusinessLead::from_values(ordinal, row.as_slice()) {
            Some(lead) => {
                if row.len() < LeadField::ALL.len() {
                    mapped.padded += 1;
                }
                mapped.leads.push(lead);
            }
            None => mapped.discarded += 1,
        }
    }
    mapped
}
