use std::path::PathBuf;

use clap::Parser;
use postcode_vehicles::reformat;
use postcode_vehicles::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        return Err(ToolError::MissingInput(cli.input));
    }
    reformat::reformat_vehicle_data(&cli.input, &cli.output)?;
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reformat ABS postcode vehicle registration data into a long table."
)]
struct Cli {
    /// The input CSV file.
    #[arg(default_value = "input.csv")]
    input: PathBuf,

    /// The output CSV file.
    #[arg(long, default_value = "output.csv")]
    output: PathBuf,
}
