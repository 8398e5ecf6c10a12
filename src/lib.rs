//! Core library for the training-plan-tools command line application.
//!
//! The library reads and writes the comma delimited training plan sheet: a
//! nine line metadata preamble, a column header line, and one row per week.
//! The pure text conversions live under [`io`] (the [`io::delimited`]
//! tokenizer, the [`io::plan_read`] parser and the [`io::plan_write`]
//! serializer), the record types in [`model`], and the file level
//! conversions used by the CLI in [`sync`].

pub mod error;
pub mod io;
pub mod model;
pub mod sync;

pub use error::{Result, ToolError};
pub use io::plan_read::{header_lines_of, parse_training_plan};
pub use io::plan_write::serialize_training_plan;
pub use model::{TrainingWeek, Workout};
