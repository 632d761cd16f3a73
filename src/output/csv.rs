//! CSV export of scan results.
//!
//! Minimal rows carry `Path,Length,Excess`; detailed rows (`--detailed`) carry
//! `Type,Path,Length,Excess,Name,Parent,Size`. The header row is always
//! written, even when there are no violations.

use crate::cli::Args;
use crate::data::Violation;
use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ViolationRow<'a> {
    path: &'a str,
    length: u32,
    excess: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetailedViolationRow<'a> {
    #[serde(rename = "Type")]
    kind: &'a str,
    path: &'a str,
    length: u32,
    excess: u32,
    name: &'a str,
    parent: &'a str,
    size: Option<u64>,
}

/// Serializes `violations` as CSV into `writer`.
pub fn write<W: io::Write>(violations: &[Violation], detailed: bool, writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    if violations.is_empty() {
        let header: &[&str] = if detailed {
            &["Type", "Path", "Length", "Excess", "Name", "Parent", "Size"]
        } else {
            &["Path", "Length", "Excess"]
        };
        csv_writer.write_record(header)?;
    }

    for v in violations {
        if detailed {
            csv_writer.serialize(DetailedViolationRow {
                kind: v.kind.map(|k| k.as_str()).unwrap_or(""),
                path: &v.path,
                length: v.length,
                excess: v.excess,
                name: &v.name,
                parent: &v.parent,
                size: v.size,
            })?;
        } else {
            csv_writer.serialize(ViolationRow {
                path: &v.path,
                length: v.length,
                excess: v.excess,
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders violations as CSV to `--output`, or to stdout when no file is given.
///
/// # Errors
/// Returns an error if the file cannot be created or written. The caller
/// still holds the violations and can fall back to another renderer.
pub fn render(violations: &[Violation], args: &Args) -> Result<()> {
    match &args.output {
        Some(output_file) => {
            let file = File::create(output_file)
                .with_context(|| format!("Failed to create {}", output_file))?;
            write(violations, args.detailed, file)
                .with_context(|| format!("Failed to write {}", output_file))?;
            println!("Output saved to: {}", output_file);
        }
        None => write(violations, args.detailed, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Entry, EntryKind};
    use crate::filter::check;

    fn sample() -> Vec<Violation> {
        let entry = Entry {
            path: "/srv/share/projects/report.txt".to_string(),
            kind: Some(EntryKind::File),
            size: Some(2048),
        };
        vec![check(&entry, 20).unwrap()]
    }

    #[test]
    fn test_minimal_columns() {
        let mut buf = Vec::new();
        write(&sample(), false, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Path,Length,Excess\n/srv/share/projects/report.txt,30,10\n");
    }

    #[test]
    fn test_detailed_columns() {
        let mut buf = Vec::new();
        write(&sample(), true, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Type,Path,Length,Excess,Name,Parent,Size")
        );
        assert_eq!(
            lines.next(),
            Some("File,/srv/share/projects/report.txt,30,10,report.txt,/srv/share/projects,2048")
        );
    }

    #[test]
    fn test_empty_result_still_has_header() {
        let mut buf = Vec::new();
        write(&[], false, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Path,Length,Excess\n");
    }
}
