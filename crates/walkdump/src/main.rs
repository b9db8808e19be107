use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use walkdump_logging::{init_tracing, LogFormat};
use walkdump_reader::{diff_sessions, extract, list_sessions, locate, ReaderError, Timestamp};

mod config;
mod output;

use config::ReaderConfig;

#[derive(Parser, Debug)]
#[command(
    name = "walkdump",
    about = "Extract the latest, or a selected, object_walker dump from automation.log",
    version
)]
struct Cli {
    /// List the object_walker dumps in the log
    #[arg(short, long, conflicts_with_all = ["timestamp", "diff"])]
    list: bool,

    /// Log file to read (default: /var/www/miq/vmdb/log/automation.log)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Timestamp of the dump to print (hint: copy from --list output)
    #[arg(short, long, conflicts_with = "diff")]
    timestamp: Option<Timestamp>,

    /// Diff two dumps, given as TIMESTAMP1,TIMESTAMP2
    #[arg(short, long, value_name = "TIMESTAMP1,TIMESTAMP2", value_parser = parse_diff_pair)]
    diff: Option<DiffPair>,

    /// Print the listing as JSON lines
    #[arg(long, requires = "list")]
    json: bool,

    /// Configuration file (default: <config dir>/walkdump/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Diagnostic log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormatChoice,
}

/// The two sides of `--diff`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DiffPair {
    old: Timestamp,
    new: Timestamp,
}

fn parse_diff_pair(value: &str) -> std::result::Result<DiffPair, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [old, new] = parts.as_slice() else {
        return Err(format!(
            "expected exactly two comma-separated timestamps, got {}",
            parts.len()
        ));
    };
    let parse = |s: &str| s.parse::<Timestamp>().map_err(|e: ReaderError| e.to_string());
    Ok(DiffPair {
        old: parse(*old)?,
        new: parse(*new)?,
    })
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format.into());

    if let Err(e) = run(cli) {
        // The reader of our stdout went away (`walkdump | head`).
        if is_broken_pipe(&e) {
            return;
        }
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn run(cli: Cli) -> Result<()> {
    let config = ReaderConfig::load(cli.config.as_deref())?;
    let path = config.log_file(cli.file.as_deref());
    let style = config.render_style();

    let file = File::open(&path)
        .with_context(|| format!("Error opening log file {}", path.display()))?;
    let mut log = BufReader::new(file);
    tracing::debug!(path = %path.display(), "Opened log file");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        let sessions = list_sessions(&mut log)?;
        output::print_sessions(&mut out, &sessions, cli.json)?;
    } else if let Some(DiffPair { old, new }) = &cli.diff {
        let diff = diff_sessions(&mut log, old, new, &style)?;
        output::print_diff(&mut out, &diff)?;
    } else {
        let session = locate(&mut log, cli.timestamp.as_ref())?;
        extract(&mut log, &session, &style, &mut out)?;
    }

    Ok(())
}
