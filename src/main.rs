//! labelgate CLI entry point.
//!
//! Thin diagnostic front end over the library: validate a context, read a
//! file's label, compare two contexts, or translate between levels and
//! markings. It enforces nothing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use labelgate::config::LabelgateConfig;
use labelgate::{translate, MlsLevel, SecurityContext, XattrReader};

/// Validate, read and translate SELinux MLS labels.
#[derive(Parser)]
#[command(name = "labelgate", version, about)]
struct Cli {
    /// Config file (overrides `$LABELGATE_CONFIG_PATH`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Parse a context and print its canonical form.
    Check {
        /// Context such as `system_u:object_r:etc_t:s0:c1,c2`.
        context: String,
    },
    /// Read and validate the label of a file.
    Read {
        /// File to open.
        path: PathBuf,
    },
    /// Report whether SUBJECT dominates OBJECT.
    Dominates {
        /// Subject context.
        subject: String,
        /// Object context.
        object: String,
    },
    /// Render a level through the translation table.
    Translate {
        /// Level such as `s0:c90,c99`.
        level: String,
    },
    /// List the levels that carry a marking.
    Marking {
        /// Marking name such as `CUI//LEI/INV`.
        name: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = LabelgateConfig::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => LabelgateConfig::load()?,
    };

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    let _logging_guard = match log_dir {
        Some(dir) => Some(labelgate::logging::init_production(&dir, &config.logging.level)?),
        None => {
            labelgate::logging::init_cli(&config.logging.level);
            None
        }
    };
    debug!(?config, "configuration resolved");

    match cli.command {
        Command::Check { context } => handle_check(&context),
        Command::Read { path } => handle_read(&config, &path),
        Command::Dominates { subject, object } => handle_dominates(&subject, &object),
        Command::Translate { level } => handle_translate(&config, &level),
        Command::Marking { name } => handle_marking(&config, &name),
    }
}

fn handle_check(raw: &str) -> anyhow::Result<ExitCode> {
    let context: SecurityContext = raw.parse().context("context rejected")?;
    println!("{context}");
    Ok(ExitCode::SUCCESS)
}

fn handle_read(config: &LabelgateConfig, path: &Path) -> anyhow::Result<ExitCode> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = XattrReader::from_config(&config.xattr);
    let context = reader
        .read_context(&file)
        .with_context(|| format!("failed to read label of {}", path.display()))?;
    let table = translate::init_global(&config.translation);
    println!("{context}");
    println!("marking: {}", table.render(context.level()));
    Ok(ExitCode::SUCCESS)
}

fn handle_dominates(subject: &str, object: &str) -> anyhow::Result<ExitCode> {
    let subject: SecurityContext = subject.parse().context("subject rejected")?;
    let object: SecurityContext = object.parse().context("object rejected")?;
    if subject.dominates(&object) {
        println!("{subject} dominates {object}");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{subject} does not dominate {object}");
        Ok(ExitCode::FAILURE)
    }
}

fn handle_translate(config: &LabelgateConfig, raw: &str) -> anyhow::Result<ExitCode> {
    let level: MlsLevel = raw.parse().context("level rejected")?;
    let table = translate::init_global(&config.translation);
    println!("{}", table.render(&level));
    Ok(ExitCode::SUCCESS)
}

fn handle_marking(config: &LabelgateConfig, name: &str) -> anyhow::Result<ExitCode> {
    let table = translate::init_global(&config.translation);
    let levels = table.lookup_by_marking(name);
    if levels.is_empty() {
        println!("no level carries marking {name}");
        return Ok(ExitCode::FAILURE);
    }
    for (level, detail) in levels {
        match detail {
            Some(detail) => println!("{level}  # {detail}"),
            None => println!("{level}"),
        }
    }
    Ok(ExitCode::SUCCESS)
}
