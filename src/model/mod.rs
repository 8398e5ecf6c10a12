use serde::{Deserialize, Serialize};

/// Largest magnitude a cell may carry and still be typed as a number. Larger
/// literals stay as text so their digits are not silently rounded.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// One quality session within a training week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Free-text description of the session, e.g. `8k tempo`.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Part of the record shape but never populated from plan text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_distance: Option<f64>,
}

impl Workout {
    /// Creates a workout with the given description and notes.
    pub fn new(description: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            notes: Some(notes.into()),
            target_distance: None,
        }
    }
}

/// One row of a training plan.
///
/// Weeks carry no identity beyond their position in the plan, so callers
/// keep them in a `Vec` in source row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingWeek {
    pub weeks_until_race: f64,
    pub fraction_of_peak: f64,
    pub q1: Workout,
    pub q2: Workout,
    pub weekly_easy_mileage: f64,
    /// Absent when the cell was empty or not numeric, as opposed to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TrainingWeek {
    /// Returns `true` for rows that carry neither a week number nor a first
    /// workout. Such rows are padding at the end of the source sheet.
    pub fn is_blank(&self) -> bool {
        self.weeks_until_race == 0.0 && self.q1.description.is_empty()
    }
}

/// Value of a single cell after best-effort typing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Types a raw field: decimal literals become numbers, empty fields
    /// become [`CellValue::Empty`], everything else is kept as text.
    pub fn from_field(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        if is_decimal_literal(raw) {
            if let Ok(number) = raw.trim().parse::<f64>() {
                if number.abs() < MAX_EXACT_INTEGER {
                    return CellValue::Number(number);
                }
            }
        }
        CellValue::Text(raw.to_string())
    }
}

/// Matches `-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?` with optional
/// surrounding whitespace.
fn is_decimal_literal(raw: &str) -> bool {
    let bytes = raw.trim().as_bytes();
    let mut pos = 0;

    if bytes.first() == Some(&b'-') {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
