//! Grow bonsai trees in the terminal.

pub mod base;
pub mod bonsai;
pub mod canvas;
pub mod cli;
pub mod colors;
pub mod config;
pub mod direction;
pub mod error;
pub mod glyph;
pub mod message;
pub mod persist;
pub mod session;
pub mod settings;
pub mod terminal;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::Cli;
use config::BonsaiConfig;
use session::{Report, Session};
use settings::Settings;
use std::ffi::OsString;
use std::io::{self, Write};
use terminal::Terminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter; logging is off when unset
pub const LOG_ENV: &str = "TERMBONSAI_LOG";

/// Run the program with the given arguments and return its exit status
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    init_logging();

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{err}");
                    0
                }
                _ => {
                    println!("{err}");
                    println!("{}", Cli::command().render_help());
                    1
                }
            };
        }
    };

    let settings = Settings::load();
    let config = cli.into_config(&settings.bonsai);

    match grow(config) {
        Ok(()) => 0,
        Err(err) => {
            println!("error: {err}");
            1
        }
    }
}

fn init_logging() {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };
    // The terminal belongs to the tree; logs go to stderr without colors
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn grow(mut config: BonsaiConfig) -> io::Result<()> {
    let target = session::restore(&mut config);

    let outcome = if config.print {
        let mut screen = Terminal::detached();
        Session::new(&config, &mut screen).run(target)
    } else {
        if !config.mono && crossterm::style::available_color_count() < 8 {
            tracing::warn!("terminal lacks color support");
            println!("warning: terminal does not support colors, drawing in monochrome");
            config.mono = true;
        }

        // Dropping the terminal restores it before anything else is printed
        let mut terminal = Terminal::new()?;
        Session::new(&config, &mut terminal).run(target)
    };

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            // Whatever was grown is still saved
            finish(&config, &err.report);
            return Err(err.source);
        }
    };

    if config.print {
        print_frame(&report)?;
    }
    finish(&config, &report);
    Ok(())
}

fn print_frame(report: &Report) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if let Some(frame) = &report.frame {
        for line in frame.snapshot() {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()
}

fn finish(config: &BonsaiConfig, report: &Report) {
    if let Some(path) = &config.save {
        if let Err(err) = report.save(path) {
            tracing::warn!(%err, "could not save tree");
            println!("error: {err}");
        }
    }
}
