// GridPad CLI - headless delimited-text operations

mod exit_codes;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gridpad_engine::session::EditorSession;
use gridpad_io::csv::{
    delimiter_for_path, export, parse_str, read_file_as_utf8, sniff_delimiter, DelimitedCodec,
};

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gridpad")]
#[command(about = "Delimited text editor (CLI mode, headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a delimited file and report its shape
    #[command(after_help = "\
Examples:
  gridpad check data.csv
  gridpad check data.tsv --json

Exit codes:
  0  File is well-formed
  4  Parse error (line and column counts printed to stderr)")]
    Check {
        /// File to validate
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert between delimiter formats
    #[command(after_help = "\
Examples:
  gridpad convert data.csv -o data.tsv
  gridpad convert export.txt --sniff -o clean.csv
  gridpad convert data.semi.txt --delimiter ';' -o data.csv")]
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file (delimiter chosen by its extension)
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Input delimiter (default: by input extension)
        #[arg(long, conflicts_with = "sniff")]
        delimiter: Option<char>,

        /// Detect the input delimiter from content
        #[arg(long)]
        sniff: bool,
    },

    /// Find cells containing a substring
    #[command(after_help = "\
Examples:
  gridpad search data.csv pending
  gridpad search data.csv 'Widget Co' --ignore-case --json

Output lines are row,column: value with 0-based data coordinates
(row 0 is the first data row, not the header).

Exit codes:
  0  At least one match
  1  No matches")]
    Search {
        /// File to search
        file: PathBuf,

        /// Substring to look for
        query: String,

        /// Case-insensitive matching
        #[arg(long, short = 'i')]
        ignore_case: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace matching cells with new text
    #[command(after_help = "\
Examples:
  gridpad replace data.csv pending shipped
  gridpad replace data.csv pending shipped -o updated.csv
  gridpad replace data.csv N/A '' --ignore-case -o clean.csv

Each matching cell is replaced whole. With no -o the result is
written to stdout; the replacement count goes to stderr.")]
    Replace {
        /// File to rewrite
        file: PathBuf,

        /// Substring that marks a cell for replacement
        query: String,

        /// Text the whole cell becomes
        replacement: String,

        /// Case-insensitive matching
        #[arg(long, short = 'i')]
        ignore_case: bool,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Suppress the stderr replacement count
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: gridpad <command> [options]");
            eprintln!("       gridpad --help for more information");
            Ok(())
        }
        Some(Commands::Check { file, json }) => cmd_check(file, json),
        Some(Commands::Convert {
            input,
            output,
            delimiter,
            sniff,
        }) => cmd_convert(input, output, delimiter, sniff),
        Some(Commands::Search {
            file,
            query,
            ignore_case,
            json,
        }) => cmd_search(file, query, ignore_case, json),
        Some(Commands::Replace {
            file,
            query,
            replacement,
            ignore_case,
            output,
            quiet,
        }) => cmd_replace(file, query, replacement, ignore_case, output, quiet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Open a file as an editor session on the delimiter its extension
/// implies. Parse failures become CLI errors here; the GUI path keeps
/// the raw text instead.
fn open_session(path: &PathBuf) -> Result<EditorSession, CliError> {
    match gridpad_io::csv::import(path) {
        Ok(doc) => Ok(EditorSession::new(
            doc,
            Box::new(DelimitedCodec::for_path(path)),
        )),
        Err(gridpad_io::csv::ImportError::Io(msg)) => {
            Err(CliError::io(format!("{}: {}", path.display(), msg)))
        }
        Err(gridpad_io::csv::ImportError::Parse { error, .. }) => {
            Err(CliError::parse(format!("{}: {}", path.display(), error)))
        }
    }
}

// ============================================================================
// check
// ============================================================================

fn cmd_check(file: PathBuf, json: bool) -> Result<(), CliError> {
    let content =
        read_file_as_utf8(&file).map_err(|e| CliError::io(format!("{}: {}", file.display(), e)))?;

    match parse_str(&content, delimiter_for_path(&file)) {
        Ok(doc) => {
            if json {
                let summary = serde_json::json!({
                    "ok": true,
                    "rows": doc.row_count(),
                    "columns": doc.column_count(),
                });
                println!("{}", summary);
            } else {
                println!(
                    "{}: {} rows, {} columns",
                    file.display(),
                    doc.row_count(),
                    doc.column_count()
                );
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let summary = serde_json::json!({
                    "ok": false,
                    "line": err.line,
                    "expected": err.expected,
                    "actual": err.actual,
                    "message": err.to_string(),
                });
                println!("{}", summary);
                Err(CliError::silent(EXIT_PARSE))
            } else {
                Err(CliError::parse(format!("{}: {}", file.display(), err)))
            }
        }
    }
}

// ============================================================================
// convert
// ============================================================================

fn cmd_convert(
    input: PathBuf,
    output: PathBuf,
    delimiter: Option<char>,
    sniff: bool,
) -> Result<(), CliError> {
    let content = read_file_as_utf8(&input)
        .map_err(|e| CliError::io(format!("{}: {}", input.display(), e)))?;

    let in_delim = match delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => {
            return Err(CliError::args(format!("delimiter {:?} is not ASCII", c))
                .with_hint("use a single-byte delimiter like ',' ';' '|' or tab"))
        }
        None if sniff => sniff_delimiter(&content),
        None => delimiter_for_path(&input),
    };

    let doc = parse_str(&content, in_delim)
        .map_err(|e| CliError::parse(format!("{}: {}", input.display(), e)))?;

    export(&doc, &output, delimiter_for_path(&output))
        .map_err(|e| CliError::io(format!("{}: {}", output.display(), e)))
}

// ============================================================================
// search
// ============================================================================

fn cmd_search(file: PathBuf, query: String, ignore_case: bool, json: bool) -> Result<(), CliError> {
    if query.is_empty() {
        return Err(CliError::args("empty search query"));
    }

    let mut session = open_session(&file)?;
    let matches = session.find_all(&query, !ignore_case);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let entries: Vec<serde_json::Value> = matches
            .iter()
            .map(|(row, col, value)| {
                serde_json::json!({ "row": row, "col": col, "value": value })
            })
            .collect();
        writeln!(handle, "{}", serde_json::Value::Array(entries))
            .map_err(|e| CliError::io(e.to_string()))?;
    } else {
        for (row, col, value) in &matches {
            writeln!(handle, "{},{}: {}", row, col, value)
                .map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    if matches.is_empty() {
        Err(CliError::silent(EXIT_ERROR))
    } else {
        Ok(())
    }
}

// ============================================================================
// replace
// ============================================================================

fn cmd_replace(
    file: PathBuf,
    query: String,
    replacement: String,
    ignore_case: bool,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    if query.is_empty() {
        return Err(CliError::args("empty search query"));
    }

    let mut session = open_session(&file)?;
    let count = session.replace_all(&query, &replacement, !ignore_case);

    if !quiet {
        eprintln!("{} cells replaced", count);
    }

    let text = session.save_text();
    match output {
        Some(path) => std::fs::write(&path, text)
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e))),
        None => io::stdout()
            .write_all(text.as_bytes())
            .map_err(|e| CliError::io(e.to_string())),
    }
}
