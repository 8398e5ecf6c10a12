use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use training_plan_tools::sync;
use training_plan_tools::{Result, ToolError};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync(args) => execute_sync(args),
    }
}

fn execute_sync(args: SyncArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    match (args.from, args.to) {
        (DataFormat::Plan, DataFormat::Json) => sync::plan_to_json(&args.input, &args.output),
        (DataFormat::Json, DataFormat::Plan) => {
            let template = args.template.ok_or(ToolError::MissingTemplate)?;
            if !template.exists() {
                return Err(ToolError::MissingInput(template));
            }
            sync::json_to_plan(&args.input, &template, &args.output)
        }
        (DataFormat::Plan, DataFormat::Plan) => sync::normalize_plan(&args.input, &args.output),
        _ => Err(ToolError::UnsupportedConversion {
            from: args.from.to_string(),
            to: args.to.to_string(),
        }),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert training plan sheets to and from JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a plan between representations, or normalise a plan file.
    Sync(SyncArgs),
}

#[derive(clap::Args)]
struct SyncArgs {
    /// Source representation.
    #[arg(long, value_enum)]
    from: DataFormat,

    /// Input file path.
    #[arg(long)]
    input: PathBuf,

    /// Target representation.
    #[arg(long, value_enum)]
    to: DataFormat,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,

    /// Plan file whose preamble and column header are reused when writing a
    /// plan from JSON.
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DataFormat {
    Plan,
    Json,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Plan => write!(f, "plan"),
            DataFormat::Json => write!(f, "json"),
        }
    }
}
