#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # baseline
//!
//! Command line entry point for the class uniqueness checks.
//!
//! `baseline check-class-uniqueness` compares the conflicts found across the
//! configurations of `baseline-dependencies.json` with
//! `baseline-class-uniqueness.lock`, and `--write-locks` rewrites the lock
//! file. `baseline check-unique-class-names` fails on any duplicated class.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use baseline::{
    analyze_configurations, check_all_configuration_class_names, check_class_uniqueness,
    check_unique_class_names,
    config::{self, Settings},
    describe,
    lock::LockMode,
    manifest::Manifest,
};
use bpaf::*;
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Subcommands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Check (or rewrite) the lock file
    CheckClassUniqueness {
        /// rewrite the lock file instead of checking it
        write_locks: bool,
        /// manifest override
        manifest:    Option<PathBuf>,
        /// lock file override
        lock_file:   Option<PathBuf>,
    },
    /// Fail on any identically named class
    CheckUniqueClassNames {
        /// manifest override
        manifest:      Option<PathBuf>,
        /// single configuration to check
        configuration: Option<String>,
        /// jars or directories of jars to check instead of the manifest
        files:         Vec<PathBuf>,
    },
    /// Print the findings as JSON
    Analyze {
        /// manifest override
        manifest: Option<PathBuf>,
    },
}

/// Top-level options.
#[derive(Debug, Clone)]
struct Options {
    /// project root override
    root:    Option<PathBuf>,
    /// log at debug level
    verbose: bool,
    /// the subcommand
    cmd:     Cmd,
}

/// Parse the command line arguments and return the `Options`
fn options() -> Options {
    /// parses the manifest override
    fn manifest() -> impl Parser<Option<PathBuf>> {
        long("manifest")
            .help("Resolved dependency manifest (default: <root>/baseline-dependencies.json)")
            .argument::<PathBuf>("PATH")
            .optional()
    }

    let write_locks = long("write-locks")
        .help("Rewrite the lock file to match the current conflicts")
        .switch();
    let lock_file = long("lock-file")
        .help("Lock file (default: <root>/baseline-class-uniqueness.lock)")
        .argument::<PathBuf>("PATH")
        .optional();
    let check_class_uniqueness = {
        let manifest = manifest();
        construct!(Cmd::CheckClassUniqueness {
            write_locks,
            manifest,
            lock_file
        })
        .to_options()
        .command("check-class-uniqueness")
        .help("Check that differing duplicate classes match the lock file")
    };

    let configuration = long("configuration")
        .help("Only check this configuration of the manifest")
        .argument::<String>("NAME")
        .optional();
    let files = positional::<PathBuf>("JAR_OR_DIR")
        .help("Jars, or directories searched for jars, to check instead of the manifest")
        .many();
    let check_unique_class_names = {
        let manifest = manifest();
        construct!(Cmd::CheckUniqueClassNames {
            manifest,
            configuration,
            files
        })
        .to_options()
        .command("check-unique-class-names")
        .help("Fail if any class name appears in more than one jar")
    };

    let analyze = {
        let manifest = manifest();
        construct!(Cmd::Analyze { manifest })
            .to_options()
            .command("analyze")
            .help("Print duplicate classes of every configuration as JSON")
    };

    let cmd = construct!([check_class_uniqueness, check_unique_class_names, analyze]);

    let root = long("root")
        .help("Project root directory (default: $BASELINE_ROOT_DIR or .)")
        .argument::<PathBuf>("DIR")
        .optional();
    let verbose = short('v').long("verbose").help("Log debug output").switch();

    construct!(Options { root, verbose, cmd })
        .to_options()
        .descr("Class uniqueness checks for Java dependency graphs")
        .run()
}

/// Applies command line overrides on top of the environment and installs the
/// result as the process-wide settings.
fn settings(
    root: Option<PathBuf>,
    lock_file: Option<PathBuf>,
    manifest: Option<PathBuf>,
) -> Arc<Settings> {
    let from_env = config::get().as_ref().clone();
    let settings = config::install(from_env.with_overrides(root, lock_file, manifest));
    tracing::debug!(
        "Project root {}, manifest {}, lock file {}",
        settings.root_dir().display(),
        settings.manifest().display(),
        settings.lock_file().display()
    );
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let Options { root, verbose, cmd } = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(if verbose { Level::DEBUG } else { Level::INFO });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match cmd {
        Cmd::CheckClassUniqueness {
            write_locks,
            manifest,
            lock_file,
        } => {
            let settings = settings(root, lock_file, manifest);
            let mode = if write_locks {
                LockMode::Write
            } else {
                LockMode::Check
            };

            check_class_uniqueness(&settings, mode).await?;
        }
        Cmd::CheckUniqueClassNames {
            manifest,
            configuration,
            files,
        } => {
            if !files.is_empty() {
                check_unique_class_names(&files)?;
                return Ok(());
            }

            let settings = settings(root, None, manifest);
            let manifest = Manifest::load(settings.manifest())?;
            check_all_configuration_class_names(&manifest, configuration.as_deref())?;
        }
        Cmd::Analyze { manifest } => {
            let settings = settings(root, None, manifest);
            let manifest = Manifest::load(settings.manifest())?;
            let results = analyze_configurations(&manifest).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&describe(&results))
                    .context("Could not serialize findings")?
            );
        }
    };

    Ok(())
}
