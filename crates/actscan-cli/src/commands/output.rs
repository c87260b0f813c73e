//! Output formatting shared by the extract and process commands.

use actscan_core::{ActivityRecord, Field};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per record
    Csv,
    /// Plain text table
    Text,
}

/// CSV with a `file` column, one column per field, and the raw text last.
pub fn format_csv(records: &[ActivityRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["file"];
    header.extend(Field::ALL.iter().map(|f| f.key()));
    header.push("rawText");
    wtr.write_record(&header)?;

    for record in records {
        let mut row = vec![record.file()];
        row.extend(Field::ALL.iter().map(|f| record.get(*f).unwrap_or("")));
        row.push(record.raw_text());
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Aligned table; missing fields print as `-`.
pub fn format_text(records: &[ActivityRecord]) -> String {
    if records.is_empty() {
        return "No analysis data available\n".to_string();
    }

    let mut header = vec!["File"];
    header.extend(Field::ALL.iter().map(|f| f.label()));

    let rows: Vec<Vec<&str>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.file()];
            row.extend(Field::ALL.iter().map(|f| r.get(*f).unwrap_or("-")));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell.replace('\n', " "), width = *width))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    }

    output
}
