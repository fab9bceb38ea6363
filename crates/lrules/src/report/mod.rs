//! Recovery of interval rules from rule-discovery reports.

pub mod bounds;
pub mod markup;
pub mod parser;

pub use bounds::{BoundDelimiter, BoundParser};
pub use parser::{ParsedReport, ReportHeader, ReportLayout, ReportParser};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use std::path::Path;

/// Reads a report file. UTF-8 content is used as is; anything else is
/// decoded as Windows-1251, the encoding the reporting tool writes.
pub fn read_report<P: AsRef<Path>>(path: P, diagnostics: &dyn Diagnostics) -> Result<String> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(decode_report(bytes, path.as_ref(), diagnostics))
}

fn decode_report(bytes: Vec<u8>, path: &Path, diagnostics: &dyn Diagnostics) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            diagnostics.debug(&format!(
                "{} is not UTF-8, decoding as windows-1251",
                path.display()
            ));
            let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(err.as_bytes());
            if had_errors {
                diagnostics.warn(&format!("{} has undecodable bytes", path.display()));
            }
            text.into_owned()
        }
    }
}
