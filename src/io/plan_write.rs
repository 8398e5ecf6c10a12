use tracing::{debug, instrument};

use crate::io::delimited::{DELIMITER, escape_field, format_number};
use crate::io::plan_read::sanitize_header_line;
use crate::model::TrainingWeek;

/// Unused columns the source sheet carries before `Weeks until race`.
pub const LEADING_PLACEHOLDER_COLUMNS: usize = 3;

/// Serialises `weeks` below the given header section.
///
/// The header lines are written back with the delimiter-bearing labels
/// quoted, followed by one row per week in the sheet's fixed column order.
/// An empty plan produces the header section and a trailing line feed.
#[instrument(level = "debug", skip_all, fields(week_count = weeks.len()))]
pub fn serialize_training_plan(weeks: &[TrainingWeek], header_lines: &[String]) -> String {
    let header = header_lines
        .iter()
        .map(|line| sanitize_header_line(line))
        .collect::<Vec<_>>()
        .join("\n");

    let rows = weeks.iter().map(week_to_row).collect::<Vec<_>>().join("\n");

    debug!(header_line_count = header_lines.len(), "serialised training plan");
    format!("{header}\n{rows}")
}

fn week_to_row(week: &TrainingWeek) -> String {
    let optional_number = |value: Option<f64>| value.map(format_number).unwrap_or_default();
    let optional_text = |value: Option<&str>| value.map(escape_field).unwrap_or_default();

    let mut fields = vec![String::new(); LEADING_PLACEHOLDER_COLUMNS];
    fields.extend([
        format_number(week.weeks_until_race),
        format_number(week.fraction_of_peak),
        escape_field(&week.q1.description),
        optional_text(week.q1.notes.as_deref()),
        escape_field(&week.q2.description),
        optional_text(week.q2.notes.as_deref()),
        format_number(week.weekly_easy_mileage),
        optional_number(week.actual_mileage),
        optional_number(week.difference),
        optional_text(week.notes.as_deref()),
    ]);

    let separator = DELIMITER.to_string();
    fields.join(separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::plan_read::{header_lines_of, parse_training_plan};
    use crate::model::Workout;

    fn header_lines() -> Vec<String> {
        let mut lines: Vec<String> = (1..=9).map(|idx| format!("Meta {idx}")).collect();
        lines.push(
            ",,,Weeks until race,Fraction of peak,Workout Q1 (k),Notes Q1, for Q1,Worout Q2 (),Notes Q2, for Q2,Weekly Easy Mileage (k),Actual (k),Difference (k),Notes"
                .to_string(),
        );
        lines
    }

    fn sample_week() -> TrainingWeek {
        TrainingWeek {
            weeks_until_race: 12.0,
            fraction_of_peak: 0.75,
            q1: Workout::new("8k easy", "foo, \"bar\""),
            q2: Workout::new("6k tempo", "line one\nline two"),
            weekly_easy_mileage: 40.0,
            actual_mileage: None,
            difference: Some(-2.0),
            notes: Some("ok".into()),
        }
    }

    #[test]
    fn writes_rows_in_fixed_column_order() {
        let text = serialize_training_plan(&[sample_week()], &header_lines());
        let row = text.split_once("Notes\n").map(|(_, rows)| rows).expect("data rows");

        assert_eq!(
            row,
            ",,,12,0.75,8k easy,\"foo, \"\"bar\"\"\",6k tempo,\"line one\nline two\",40,,-2,ok"
        );
    }

    #[test]
    fn header_section_is_sanitised() {
        let text = serialize_training_plan(&[], &header_lines());
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines.len(), 11);
        assert!(lines[9].contains(",\"Notes Q1, for Q1\","));
        assert!(lines[9].contains(",\"Notes Q2, for Q2\","));
        assert_eq!(lines[10], "");
    }

    #[test]
    fn absent_notes_become_empty_fields() {
        let mut week = sample_week();
        week.q1.notes = None;
        week.q2.notes = None;
        week.notes = None;
        week.actual_mileage = Some(38.0);

        let text = serialize_training_plan(&[week], &[]);

        assert_eq!(text, "\n,,,12,0.75,8k easy,,6k tempo,,40,38,-2,");
    }

    #[test]
    fn round_trip_preserves_weeks() {
        let weeks = vec![
            sample_week(),
            TrainingWeek {
                weeks_until_race: 0.0,
                fraction_of_peak: 1.0,
                q1: Workout::new("Race", ""),
                q2: Workout::new("", ""),
                weekly_easy_mileage: 0.0,
                actual_mileage: Some(42.2),
                difference: None,
                notes: Some(String::new()),
            },
        ];

        let text = serialize_training_plan(&weeks, &header_lines());
        let parsed = parse_training_plan(&text);

        assert_eq!(parsed, weeks);

        let again = serialize_training_plan(&parsed, &header_lines_of(&text));
        assert_eq!(again, text);
    }

    #[test]
    fn round_trip_preserves_infinite_and_tiny_numbers() {
        let mut lines = header_lines();
        lines.push(",,,5,0.5,8k,,6k,,20,1e999,-1e999,ok".to_string());
        lines.push(",,,4,0.0000001,7k,,5k,,20,1e-7,1e21,".to_string());
        let first = parse_training_plan(&lines.join("\n"));

        assert_eq!(first[0].actual_mileage, Some(f64::INFINITY));
        assert_eq!(first[0].difference, Some(f64::NEG_INFINITY));

        let text = serialize_training_plan(&first, &header_lines());
        assert!(text.contains(",20,Infinity,-Infinity,ok"));
        assert!(text.contains(",,,4,1e-7,7k,,5k,,20,1e-7,1e+21,"));

        let second = parse_training_plan(&text);
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_preserves_carriage_return_in_text() {
        let mut week = sample_week();
        week.q1.description = "8k\r tempo".into();
        week.notes = Some("a\rb".into());

        let text = serialize_training_plan(&[week.clone()], &header_lines());
        assert!(text.contains(",\"8k\r tempo\","));

        assert_eq!(parse_training_plan(&text), vec![week]);
    }
}
