use super::{HashRecord, OutputFormatter};
use anyhow::Result;
use colored::*;

/// Tab-separated `input<TAB>digest` lines
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        if self.use_color {
            Ok(format!("{}\t{}", record.input, record.digest.cyan()))
        } else {
            Ok(format!("{}\t{}", record.input, record.digest))
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(record)?)
        } else {
            Ok(serde_json::to_string(record)?)
        }
    }

    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(records)?)
        } else {
            Ok(serde_json::to_string(records)?)
        }
    }
}

/// CSV formatter for tabular output
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn write(records: &[HashRecord]) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in records {
            wtr.serialize(record)?;
        }
        if records.is_empty() {
            wtr.write_record(["input", "digest"])?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        Self::write(std::slice::from_ref(record))
    }

    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        Self::write(records)
    }
}
