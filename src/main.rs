use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;
use clap::Parser;
use anyhow::{Result, Context};
use log::{debug, warn, error};
use simple_logger::SimpleLogger;

use spec_reporter::core::events::read_events;
use spec_reporter::reporters::formatter::WriterSink;
use spec_reporter::{ConsoleReporter, ReporterConfig, ReporterOptions};


/// Render a recorded test-run event stream (JSON lines) as console output.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Event file, one JSON event per line. `-` or omitted reads stdin
    events: Option<PathBuf>,

    /// Print the suite tree instead of a dot per spec
    #[arg(short, long)]
    verbose: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Include stack traces in the failure summary
    #[arg(short, long)]
    stack_trace: bool,

    /// Reporter config file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    SimpleLogger::new()
        .with_level(log_level)
        .init()
        .context("Failed to initialize logger")?;

    debug!("spec-reporter v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(2);
        }
    }
}

/// Replay the event stream and return the run verdict.
fn run(cli: &Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => ReporterConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReporterConfig::default(),
    };

    if cli.verbose {
        config.is_verbose = true;
    }
    if cli.no_color {
        config.show_colors = false;
    }
    if cli.stack_trace {
        config.include_stack_trace = true;
    }

    let reader: Box<dyn BufRead> = match &cli.events {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(io::stdin().lock()),
    };

    let events = read_events(reader).context("Failed to read events")?;

    let verdict = Rc::new(Cell::new(None));
    let seen = verdict.clone();
    let mut options = ReporterOptions::new(config).done(move |passed| seen.set(Some(passed)));

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        options = options.print(WriterSink::new(file));
    }

    let mut reporter = ConsoleReporter::new(options);
    for event in &events {
        event.dispatch(&mut reporter);
    }

    Ok(verdict.get().unwrap_or_else(|| {
        warn!("Event stream ended without run_done; no summary was printed");
        reporter.passed()
    }))
}
