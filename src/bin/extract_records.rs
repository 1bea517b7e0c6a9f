//! CLI that reads an annotated layout dump and prints the extracted records.
//!
//! Usage: `extract_records [--whole-page] [--visual] [--format text|csv|json|html] [FILE]`
//!
//! Reads stdin when no file is given. Set `RUST_LOG=recordminer=debug` to see
//! the pipeline's progress on stderr.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use recordminer::{extract_bytes_with_options, ExtractionResult, Options, Scope, TreeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Csv,
    Json,
    Html,
}

impl Format {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(Format::Text),
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "html" => Some(Format::Html),
            _ => None,
        }
    }
}

struct Args {
    scope: Scope,
    tree_kind: TreeKind,
    format: Format,
    input: Option<String>,
}

const USAGE: &str = "usage: extract_records [--whole-page] [--visual] [--format text|csv|json|html] [FILE]";

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        scope: Scope::MainRegion,
        tree_kind: TreeKind::Block,
        format: Format::Text,
        input: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--whole-page" => args.scope = Scope::WholePage,
            "--visual" => args.tree_kind = TreeKind::Visual,
            "--format" => {
                let value = iter.next().ok_or("--format needs a value")?;
                args.format = Format::parse(&value).ok_or_else(|| format!("unknown format '{value}'"))?;
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'\n{USAGE}")),
            path => {
                if args.input.replace(path.to_string()).is_some() {
                    return Err(format!("only one input file is accepted\n{USAGE}"));
                }
            }
        }
    }
    Ok(args)
}

fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

fn render(result: &ExtractionResult, format: Format) -> String {
    match format {
        Format::Text => result.text.clone(),
        Format::Csv => result.to_csv(),
        Format::Html => result.to_html(),
        Format::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let bytes = match read_input(args.input.as_deref()) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Failed to read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        tree_kind: args.tree_kind,
        ..Options::default()
    };
    match extract_bytes_with_options(&bytes, args.scope, &options) {
        Ok(result) => {
            if result.is_empty() {
                eprintln!("No data records found");
            }
            print!("{}", render(&result, args.format));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Extraction failed: {err}");
            ExitCode::FAILURE
        }
    }
}
