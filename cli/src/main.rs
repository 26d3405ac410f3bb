//! xmlsheet CLI - dump worksheet rows from an unpacked XLSX as JSON
//!
//! Reads `<stem>_xml/sharedStrings.xml` and `<stem>_xml/sheet<N>.xml` next to
//! the given spreadsheet and prints the populated rows.

use clap::Parser;
use colored::*;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use xmlsheet::options::{DEFAULT_MAX_ROWS, DEFAULT_SHEET_INDEX};
use xmlsheet::render::JsonFormat;
use xmlsheet::ExtractOptions;

const USAGE: &str = "Usage: xmlsheet <FILE> [SHEET_INDEX] [MAX_ROWS]";
const EXAMPLE: &str = "Example: xmlsheet 'data.xlsx' 1 500";

/// Exit status when FILE is missing.
const USAGE_EXIT_CODE: i32 = 1;

/// Dump worksheet rows from a pre-extracted XLSX as JSON
#[derive(Parser)]
#[command(
    name = "xmlsheet",
    author = "iyulab",
    version,
    about = "Dump worksheet rows from a pre-extracted XLSX as JSON",
    long_about = "xmlsheet - reads <stem>_xml/sharedStrings.xml and <stem>_xml/sheet<N>.xml \
                  next to the given spreadsheet and prints rows up to MAX_ROWS as JSON."
)]
struct Cli {
    /// Spreadsheet path; its `<stem>_xml` sibling folder must already exist
    input: Option<PathBuf>,

    /// Worksheet index (selects sheet<N>.xml)
    #[arg(default_value_t = DEFAULT_SHEET_INDEX)]
    sheet_index: u32,

    /// Highest row number to read
    #[arg(default_value_t = DEFAULT_MAX_ROWS)]
    max_rows: u64,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let Some(input) = cli.input.clone() else {
        let (text, code) = usage();
        print!("{}", text);
        std::process::exit(code);
    };

    if let Err(e) = run(&cli, input) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Usage text for stdout and the exit status to use with it.
fn usage() -> (String, i32) {
    (format!("{}\n{}\n", USAGE, EXAMPLE), USAGE_EXIT_CODE)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli, input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new()
        .with_sheet_index(cli.sheet_index)
        .with_max_rows(cli.max_rows);

    log::info!(
        "extracting sheet{}.xml rows 1..={} for {}",
        options.sheet_index,
        options.max_rows,
        input.display()
    );

    let result = xmlsheet::extract_with_options(&input, &options);

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = xmlsheet::render::to_json(&result, format)?;

    write_output(cli.output.as_ref(), &json)?;

    if let Some(path) = cli.output.as_ref() {
        println!("{} Wrote JSON: {}", "✓".green().bold(), path.display());
    }

    Ok(())
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
