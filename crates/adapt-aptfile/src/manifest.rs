use crate::directive::Directive;
use crate::grammar::{parse_line, ParseError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read aptfile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse aptfile:\n{0}")]
    Parse(#[from] ParseError),
}

/// Parse every line of an Aptfile, in order.
///
/// Lines are numbered from 1. Blank and comment-only lines are skipped; the
/// first line that fails to parse aborts the whole file.
pub fn parse_reader(reader: impl BufRead) -> Result<Vec<Directive>, ManifestError> {
    let mut directives = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        match parse_line(line_number, &line)? {
            Some(directive) => {
                debug!("line {line_number}: {} directive", directive.command());
                directives.push(directive);
            }
            None => debug!("line {line_number}: no directive"),
        }
    }
    Ok(directives)
}

pub fn parse_str(input: &str) -> Result<Vec<Directive>, ManifestError> {
    parse_reader(input.as_bytes())
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Directive>, ManifestError> {
    let path = path.as_ref();
    debug!("reading aptfile {}", path.display());
    let file = File::open(path)?;
    parse_reader(BufReader::new(file))
}
