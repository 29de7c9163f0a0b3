use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::error::{LeadsError, Result};
use crate::lead::{BusinessLead, LeadField};

pub const EXPORT_FILE_NAME: &str = "business_leads.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Serializes leads as comma-delimited text. Every field is quoted and
/// embedded quotes are doubled, so the output always re-tokenizes to the
/// same values. Lines are separated by a single `\n`.
pub fn export_csv<'a, I>(leads: I) -> Result<String>
where
    I: IntoIterator<Item = &'a BusinessLead>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(LeadField::ALL.iter().map(|field| field.label()))?;
    for lead in leads {
        writer.write_record(lead.values())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| LeadsError::Io(err.into_error()))?;
    let mut text = String::from_utf8(bytes).map_err(|err| LeadsError::Other(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub struct JsonlWriter<W> {
    writer: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let mut buf = serde_json::to_vec(record)?;
        buf.push(b'\n');
        self.writer.write_all(&buf)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes one JSON object per lead and returns the number written.
pub fn export_jsonl<'a, W, I>(writer: W, leads: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a BusinessLead>,
{
    let mut jsonl = JsonlWriter::new(writer);
    let mut written = 0;
    for lead in leads {
        jsonl.write_record(lead)?;
        written += 1;
    }
    jsonl.into_inner().flush()?;
    Ok(written)
}
