// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. Options for each `bitweights` subcommand are
//! contained in modules.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `Bitweights`,
//! `Bitweights::run`, and `BitweightsError`.

#[macro_use]
mod common;
mod bitweights;
mod error;
mod verify;

pub use error::BitweightsError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::info;

use crate::PROGRESS_BARS;

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Fiber-assignment bitweights for large-scale-structure galaxy surveys.
Many fiber-assignment realizations are run over a target catalog, and whether
each target was assigned in each realization is packed into 64-bit integers."#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct Bitweights {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Don't draw progress bars.
    #[clap(long)]
    #[clap(global = true)]
    no_progress_bars: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out
    /// high-level information.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    #[clap(global = true)]
    save_toml: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(alias = "run")]
    #[clap(
        about = "Run fiber-assignment realizations over a target catalog and write packed bitweights."
    )]
    Bitweights(bitweights::BitweightsArgs),

    #[clap(alias = "verify")]
    #[clap(about = "Check a bitweight catalog and summarise its assignment probabilities.")]
    BitweightsVerify(verify::VerifyArgs),
}

impl Bitweights {
    pub fn run(self) -> Result<(), BitweightsError> {
        let GlobalArgs {
            verbosity,
            dry_run,
            no_progress_bars,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity)
            .map_err(|e| BitweightsError::Generic(format!("Failed to initialise logging: {e}")))?;
        if !no_progress_bars {
            PROGRESS_BARS.store(true);
        }

        let sub_command = match &self.command {
            Command::Bitweights(_) => "bitweights",
            Command::BitweightsVerify(_) => "bitweights-verify",
        };
        info!("lss_bitweights {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        match self.command {
            Command::Bitweights(args) => {
                let args = args.merge()?;
                if let Some(toml) = save_toml {
                    let toml_str = toml::to_string(&args).map_err(|e| {
                        BitweightsError::ArgFile(format!("Couldn't serialise arguments: {e}"))
                    })?;
                    std::fs::write(toml, toml_str)?;
                }
                args.run(dry_run)?;
            }

            Command::BitweightsVerify(args) => args.run()?,
        }

        info!("lss_bitweights {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger writing to `stdout`. Colours are only used on a tty.
/// Source code lines are displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Log how this executable was compiled.
fn display_build_info() {
    let dirty = if GIT_DIRTY == Some(true) { " (dirty)" } else { "" };
    let mut printer = common::InfoPrinter::new("Build information".into());
    printer.push_line(
        format!(
            "git commit: {}{dirty}",
            GIT_COMMIT_HASH_SHORT.unwrap_or("<no git info>")
        )
        .into(),
    );
    if let Some(hr) = GIT_HEAD_REF {
        printer.push_line(format!("git head ref: {hr}").into());
    }
    printer.push_line(format!("built: {BUILT_TIME_UTC}").into());
    printer.push_line(format!("compiler: {RUSTC_VERSION}").into());
    printer.display();
}
