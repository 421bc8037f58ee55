use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use xlsheet::cli::{self, WriteArgs};
use xlsheet::types::{ColumnWidth, ModuleResponse};

#[derive(Parser)]
#[command(name = "xlsheet")]
#[command(about = "Declarative Excel worksheet writer. One invocation, one worksheet, JSON result.")]
#[command(long_about = "Xlsheet - Declarative Excel worksheet writer

Writes a JSON list of records into an .xlsx worksheet and reports whether a
change occurred, in the automation-module convention: a single JSON document
on stdout ({\"changed\": true} or {\"failed\": true, \"msg\": \"...\"}) and a
zero/non-zero exit status.

The named worksheet is always replaced wholesale. Other worksheets in the
workbook keep their cell values. Headers come from the first record's keys,
in that record's key order.

EXAMPLES:
  xlsheet write -p ./reports -f inventory.xlsx -w hosts \\
      -d '[{\"name\": \"web1\", \"cpus\": 8}, {\"name\": \"db1\", \"cpus\": 16}]' \\
      --table-name hosts --column-width '<42' --create

Logs go to stderr (RUST_LOG or --verbose); stdout stays pure JSON.")]
#[command(version)]
struct Cli {
    /// Show debug-level logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Write records into a worksheet of an .xlsx workbook.

The worksheet is replaced wholesale: existing rows under that name are gone
after the call. The header row is the first record's key set in key order;
each record's values follow positionally. With --table-name the occupied
range is registered as a named table with a medium banded style.

COLUMN WIDTH POLICY:
  auto   size each column to its longest rendered cell value (default)
  N      fixed width N for every column
  <N     auto, but never wider than N

Every successful invocation reports changed=true: there is no no-op path,
since the worksheet is unconditionally rewritten.")]
    /// Write records into a worksheet (replaces the worksheet wholesale)
    Write {
        /// Directory containing the workbook file
        #[arg(short, long)]
        path: PathBuf,

        /// Workbook file name (must end in .xlsx)
        #[arg(short, long, visible_alias = "workbook")]
        file: String,

        /// Name of the worksheet to write
        #[arg(short, long)]
        worksheet: String,

        /// JSON list of records; the first record's keys become the header row
        #[arg(short, long)]
        data: Option<String>,

        /// Register a banded table with this name over the written range
        #[arg(short, long)]
        table_name: Option<String>,

        /// Column width policy: "auto", a fixed integer, or "<N"
        #[arg(short, long, default_value = "auto")]
        column_width: ColumnWidth,

        /// Create the directory and workbook when missing
        #[arg(long)]
        create: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Write {
            path,
            file,
            worksheet,
            data,
            table_name,
            column_width,
            create,
        } => cli::write(WriteArgs {
            path,
            file,
            worksheet,
            data,
            table_name,
            column_width,
            create,
        }),
    };

    let response = match outcome {
        Ok(changed) => ModuleResponse::changed(changed),
        Err(err) => ModuleResponse::failure(err.to_string()),
    };
    println!("{}", response.render());

    if response.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "xlsheet=debug" } else { "xlsheet=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
