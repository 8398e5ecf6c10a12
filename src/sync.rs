use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::plan_read::{header_lines_of, parse_training_plan};
use crate::io::plan_write::serialize_training_plan;
use crate::model::TrainingWeek;

/// Exports a plan file as a JSON array of weeks.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn plan_to_json(input: &Path, output: &Path) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let weeks = parse_training_plan(&source);
    info!(week_count = weeks.len(), "parsed weeks from plan");
    let json_string = serde_json::to_string_pretty(&weeks)?;
    fs::write(output, json_string)?;
    Ok(())
}

/// Writes a JSON array of weeks as a plan file, reusing the header section of
/// `template`.
#[instrument(
    level = "info",
    skip_all,
    fields(
        input = %input.display(),
        template = %template.display(),
        output = %output.display()
    )
)]
pub fn json_to_plan(input: &Path, template: &Path, output: &Path) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let weeks: Vec<TrainingWeek> = serde_json::from_str(&source)?;
    info!(week_count = weeks.len(), "read weeks from JSON");
    let template_text = fs::read_to_string(template)?;
    write_plan(&weeks, &header_lines_of(&template_text), output)
}

/// Rewrites a plan file in normalised form: quoted header labels and
/// uniformly formatted rows, with blank rows removed.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn normalize_plan(input: &Path, output: &Path) -> Result<()> {
    let source = fs::read_to_string(input)?;
    let weeks = parse_training_plan(&source);
    info!(week_count = weeks.len(), "parsed weeks from plan");
    write_plan(&weeks, &header_lines_of(&source), output)
}

#[instrument(level = "debug", skip(weeks, header_lines), fields(output = %output.display()))]
fn write_plan(weeks: &[TrainingWeek], header_lines: &[String], output: &Path) -> Result<()> {
    let text = serialize_training_plan(weeks, header_lines);
    debug!(bytes = text.len(), "plan serialised");
    fs::write(output, text)?;
    Ok(())
}
