mod formatters;

pub use formatters::{CsvFormatter, JsonFormatter, TextFormatter};

use anyhow::Result;
use serde::Serialize;

/// Bulk output format
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// One input and its digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashRecord {
    pub input: String,
    pub digest: String,
}

impl HashRecord {
    pub fn new(input: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            digest: digest.into(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format a single record
    fn format_single(&self, record: &HashRecord) -> Result<String>;

    /// Format a batch of records
    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        let formatted: Result<Vec<String>> = records.iter().map(|r| self.format_single(r)).collect();

        Ok(formatted?.join("\n"))
    }
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
