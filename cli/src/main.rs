//! Graphite CLI: interactive shell over an in-memory graph collection
//!
//! Reads commands from stdin (or `--execute`), runs them through a
//! [`Session`] and prints the results as text, JSON or a table.

use anyhow::Context;
use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use graphite::{CommandOutput, Session, ShellConfig};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "graphite", version, about = "Graphite graph collection shell")]
struct Cli {
    /// Graph file to load before the first command
    #[arg(long, short = 'f', env = "GRAPHITE_FILE")]
    file: Option<PathBuf>,

    /// Prompt shown before each command
    #[arg(long, default_value = "graphite> ")]
    prompt: String,

    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Log level for diagnostics written to stderr
    #[arg(long, default_value = "warn", env = "GRAPHITE_LOG")]
    log_level: LogLevel,

    /// Run these commands in order and exit instead of starting the shell
    #[arg(long, short = 'e')]
    execute: Vec<String>,

    /// Skip the greeting
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Table,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let mut config = ShellConfig::default().with_prompt(cli.prompt.clone());
    config.banner = !cli.quiet;
    if let Some(path) = &cli.file {
        config = config.with_startup_file(path);
    }

    let session = Session::open(config).context("failed to open session")?;

    if cli.execute.is_empty() {
        run_shell(&session, cli.format).await
    } else {
        run_batch(&session, &cli.execute, cli.format).await
    }
}

/// Run each command; stop at the first failure
async fn run_batch(session: &Session, lines: &[String], format: OutputFormat) -> anyhow::Result<()> {
    for line in lines {
        let output = session
            .execute(line)
            .await
            .with_context(|| format!("command failed: {}", line))?;
        print_output(&output, format)?;
    }
    Ok(())
}

async fn run_shell(session: &Session, format: OutputFormat) -> anyhow::Result<()> {
    let config = session.config();
    if config.banner {
        println!("Graphite v{}", graphite::version());
        println!("Type HELP for commands, QUIT to exit.\n");
    }

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        eprint!("{}", config.prompt);

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if ["QUIT", "EXIT", ":q"]
            .iter()
            .any(|word| trimmed.eq_ignore_ascii_case(word))
        {
            break;
        }

        match session.execute(trimmed).await {
            Ok(output) => print_output(&output, format)?,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if config.banner {
        println!("Bye!");
    }
    Ok(())
}

fn print_output(output: &CommandOutput, format: OutputFormat) -> anyhow::Result<()> {
    match (format, output) {
        (_, CommandOutput::Empty) => {}
        (OutputFormat::Json, _) => {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
        (OutputFormat::Table, CommandOutput::Rows { column, rows }) => {
            if rows.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![column.as_str()]);
            for row in rows {
                table.add_row(vec![row.as_str()]);
            }

            println!("{}", table);
            println!("{} row(s)", rows.len());
        }
        (_, _) => {
            for line in output.lines() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
