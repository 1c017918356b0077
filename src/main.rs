//! # dotedit - a scriptable editing engine
//!
//! Loads a file into an editing session and drives it with a small
//! script of editing commands, standing in for an interactive front end.
//!
//! ## Quick Start
//!
//! ```bash
//! # Replace the first "foo" and print the result
//! cargo run -- notes.txt -e 'f foo' -e 'i bar' -e P
//!
//! # Run a script file and write the result back
//! cargo run -- notes.txt --script edits.ds -e 'w notes.txt'
//! ```

mod script;

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dotedit_core::{Config, MemoryClipboard, Session};

/// dotedit - drive a text-editing session from the command line
#[derive(Parser, Debug)]
#[command(name = "dotedit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to load
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Script command to run (repeatable, runs after --script)
    #[arg(short, long = "exec", value_name = "CMD")]
    exec: Vec<String>,

    /// File of script commands, one per line
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print the final contents
    #[arg(short, long)]
    print: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting dotedit v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load(),
    };

    let mut session = Session::with_config(config).with_clipboard(MemoryClipboard::new());
    if let Some(file) = &args.file {
        session
            .load_file(file)
            .with_context(|| format!("opening {}", file.display()))?;
    }

    let mut steps = Vec::new();
    if let Some(path) = &args.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        steps.extend(script::parse(&text)?);
    }
    for (i, line) in args.exec.iter().enumerate() {
        let step = script::parse_line(line).with_context(|| format!("-e #{}", i + 1))?;
        steps.push(step);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    script::run(&mut session, &steps, &mut out)?;

    if args.print {
        write!(out, "{}", session.contents())?;
    }
    if session.is_modified_since_save() {
        tracing::info!("Exiting with unsaved changes");
    }

    Ok(())
}
