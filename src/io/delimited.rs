//! Quoted-field tokenizer and field formatting for comma delimited text.
//!
//! This module knows nothing about training plans: it turns text into named
//! rows of [`CellValue`]s and formats individual fields for output.

use csv::{ReaderBuilder, Terminator};
use tracing::warn;

use crate::model::CellValue;

/// Field separator of the plan format.
pub const DELIMITER: char = ',';
/// Quote character used to wrap fields containing special characters.
pub const QUOTE: char = '"';

/// A delimited table whose first record provides the column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Iterates over the data rows with by-name access to their cells.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|fields| Row {
            headers: &self.headers,
            fields,
        })
    }
}

/// A borrowed data row paired with the table headers.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    fields: &'a [String],
}

impl Row<'_> {
    /// Returns the typed value of the first column called `name`. Unknown
    /// columns and cells past the end of a short row are empty.
    pub fn get(&self, name: &str) -> CellValue {
        self.headers
            .iter()
            .position(|header| header == name)
            .and_then(|idx| self.fields.get(idx))
            .map(|field| CellValue::from_field(field))
            .unwrap_or(CellValue::Empty)
    }
}

/// Tokenizes `text` into a [`Table`].
///
/// Records may have differing widths and blank lines are skipped. Only LF
/// terminates a record: a carriage return before it is dropped, while one in
/// the middle of a line stays part of its field. A record the tokenizer
/// cannot decode is logged and dropped instead of failing the whole table.
pub fn read_table(text: &str) -> Table {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut table = Table::default();
    let mut saw_headers = false;

    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(record = index, error = %err, "skipping undecodable record");
                continue;
            }
        };

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        if let Some(last) = fields.last_mut() {
            if last.ends_with('\r') {
                last.pop();
            }
        }
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }

        if saw_headers {
            table.rows.push(fields);
        } else {
            table.headers = fields;
            saw_headers = true;
        }
    }

    table
}

/// Wraps `text` in quotes, doubling embedded quotes, when it contains the
/// delimiter, a quote, or a line break. Other text is returned unchanged.
///
/// Not delegated to `csv::QuoteStyle::Necessary`: that writer quotes a
/// record holding a single empty field, while this rule depends on the text
/// alone.
pub fn escape_field(text: &str) -> String {
    let needs_quotes = text
        .chars()
        .any(|ch| ch == DELIMITER || ch == QUOTE || ch == '\n' || ch == '\r');
    if needs_quotes {
        format!("{QUOTE}{}{QUOTE}", text.replace(QUOTE, "\"\""))
    } else {
        text.to_string()
    }
}

/// Formats a number in its shortest form: `12`, `0.75`, `-2`.
///
/// Magnitudes of `1e21` and above or below `1e-6` use exponent notation
/// (`1e-7`, `1e+21`), and infinities are written as `Infinity`/`-Infinity`,
/// so every output reads back through the leading-decimal parser.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses negative zero.
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    value.to_string()
}
