use tracing::{debug, instrument, trace};

use crate::io::delimited::{self, QUOTE, Row};
use crate::model::{CellValue, TrainingWeek, Workout};

/// Number of metadata lines preceding the column header line.
pub const PREAMBLE_LINES: usize = 9;
/// Preamble plus the column header line.
pub const HEADER_SECTION_LINES: usize = PREAMBLE_LINES + 1;

pub const WEEKS_UNTIL_RACE: &str = "Weeks until race";
pub const FRACTION_OF_PEAK: &str = "Fraction of peak";
pub const Q1_WORKOUT: &str = "Workout Q1 (k)";
pub const Q1_NOTES: &str = "Notes Q1, for Q1";
/// Spelled as the source sheet spells it.
pub const Q2_WORKOUT: &str = "Worout Q2 ()";
pub const Q2_NOTES: &str = "Notes Q2, for Q2";
pub const WEEKLY_EASY_MILEAGE: &str = "Weekly Easy Mileage (k)";
pub const ACTUAL_MILEAGE: &str = "Actual (k)";
pub const DIFFERENCE: &str = "Difference (k)";
pub const NOTES: &str = "Notes";

/// Header labels that contain the delimiter and are emitted unquoted by the
/// source sheet.
const UNQUOTED_LABELS: [&str; 2] = [Q1_NOTES, Q2_NOTES];

/// Parses plan text into its weeks, in source row order.
///
/// The first [`PREAMBLE_LINES`] lines are metadata and are ignored, the next
/// line names the columns and every following line is a data row. Cells that
/// are missing or malformed fall back to defaults, and rows with neither a
/// week number nor a first workout are dropped.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn parse_training_plan(text: &str) -> Vec<TrainingWeek> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= PREAMBLE_LINES {
        debug!(line_count = lines.len(), "plan text has no header line");
        return Vec::new();
    }

    let header = sanitize_header_line(lines[PREAMBLE_LINES]);
    let block = std::iter::once(header.as_str())
        .chain(lines[HEADER_SECTION_LINES..].iter().copied())
        .collect::<Vec<_>>()
        .join("\n");

    let table = delimited::read_table(&block);
    let weeks: Vec<TrainingWeek> = table
        .rows()
        .enumerate()
        .filter_map(|(index, row)| {
            let week = row_to_week(&row);
            if week.is_blank() {
                trace!(row = index, "dropping blank row");
                None
            } else {
                Some(week)
            }
        })
        .collect();

    debug!(
        row_count = table.rows.len(),
        week_count = weeks.len(),
        "parsed training plan"
    );
    weeks
}

/// Returns the preamble and column header lines of `text`, the header
/// section a caller hands back to
/// [`serialize_training_plan`](crate::io::plan_write::serialize_training_plan).
pub fn header_lines_of(text: &str) -> Vec<String> {
    text.split('\n')
        .take(HEADER_SECTION_LINES)
        .map(str::to_string)
        .collect()
}

/// Quotes every unquoted occurrence of the two header labels that contain a
/// delimiter. Occurrences that are already quoted are kept as they are, so
/// sanitising a line twice changes nothing.
pub fn sanitize_header_line(line: &str) -> String {
    UNQUOTED_LABELS
        .iter()
        .fold(line.to_string(), |line, label| quote_label(&line, label))
}

fn quote_label(line: &str, label: &str) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut rest = line;

    while let Some(idx) = rest.find(label) {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + label.len()..];
        if out.ends_with(QUOTE) && after.starts_with(QUOTE) {
            out.push_str(label);
        } else {
            out.push(QUOTE);
            out.push_str(label);
            out.push(QUOTE);
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

fn row_to_week(row: &Row<'_>) -> TrainingWeek {
    let text = |name: &str| coerce_string(&row.get(name));
    let number = |name: &str| coerce_number(&row.get(name));

    TrainingWeek {
        weeks_until_race: number(WEEKS_UNTIL_RACE).unwrap_or(0.0),
        fraction_of_peak: number(FRACTION_OF_PEAK).unwrap_or(0.0),
        q1: Workout::new(text(Q1_WORKOUT), text(Q1_NOTES)),
        q2: Workout::new(text(Q2_WORKOUT), text(Q2_NOTES)),
        weekly_easy_mileage: number(WEEKLY_EASY_MILEAGE).unwrap_or(0.0),
        actual_mileage: number(ACTUAL_MILEAGE),
        difference: number(DIFFERENCE),
        notes: Some(text(NOTES)),
    }
}

/// Converts a cell to trimmed text. Empty cells and zero yield `""`.
pub fn coerce_string(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(number) if *number == 0.0 => String::new(),
        CellValue::Number(number) => delimited::format_number(*number),
        CellValue::Text(text) => text.trim().to_string(),
    }
}

/// Converts a cell to a number. Text is read up to the first character that
/// cannot continue a decimal literal, so `"38k"` yields `38`; text without a
/// leading number yields `None`. A leading `Infinity`, optionally signed, is
/// read as an infinite value.
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(number) => Some(*number),
        CellValue::Text(text) => parse_leading_decimal(text),
        CellValue::Empty => None,
    }
}

fn parse_leading_decimal(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        let infinity = if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(infinity);
    }

    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}
