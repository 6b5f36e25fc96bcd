//! Line-oriented input for the `bulk` command

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One input per line; blank lines are skipped and `\r\n` endings tolerated
pub fn read_lines<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for (number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", number + 1))?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Read inputs from `path`, or from stdin when no path is given
pub fn read_inputs(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            read_lines(file)
        }
        None => read_lines(std::io::stdin().lock()),
    }
}
