use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::{path::PathBuf, process};

use order_split::resolve_source_path;

/// Splits a sales data CSV file into one formatted Excel workbook per order.
///
/// Workbooks are written to an `Orders_<date>` directory next to the CSV
/// file, one per order id, named `Order<id>_<customer>.xlsx`.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[arg(value_name = "SALES_CSV")]
    /// Path of the sales data CSV file
    path: Option<PathBuf>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    /// Date used for the output directory name [default: today]
    date: Option<NaiveDate>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    /// Log progress to stderr (-v for each file written, -vv for more detail)
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            // Usage errors exit 1 like every other failure.
            if e.print().is_err() {
                eprintln!("{e}");
            }
            process::exit(1);
        }
        Err(e) => e.exit(),
    };
    init_logging(args.verbose);
    let source = resolve_source_path(args.path.as_deref())?;
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let written = order_split::run(&source, today)?;
    println!("Wrote {} order file(s)", written.len());
    Ok(())
}
