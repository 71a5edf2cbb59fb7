//! # tallyman
//!
//! A CLI tool that summarizes codebase size by language.
//!
//! ## Overview
//!
//! tallyman is built on top of tallymanlib. It walks a project directory,
//! classifies every recognized file by language and line kind (blank,
//! comment, code), and prints per-language and per-category totals with a
//! percentage breakdown bar.
//!
//! Exclusions come from three layered sources: the enclosing git
//! repository's ignore rules, the persisted `.tally-config.toml`
//! (created interactively on first run), and any nested
//! `.tally-config.toml` files discovered during the walk.
//!
//! ## Usage
//!
//! ```bash
//! # Tally the current directory
//! tallyman
//!
//! # Tally a specific directory
//! tallyman ~/projects/my-app
//!
//! # Re-run the interactive setup even if a config exists
//! tallyman --setup
//!
//! # Machine-readable output
//! tallyman --json
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use tallymanlib::{
    aggregate, count_lines, find_config, load_config, load_gitignore, save_config, walk_project,
    TallyConfig, TallymanError, CONFIG_FILENAME,
};

mod display;
mod setup;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("tallyman")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Summarize codebase size by language")
        .arg(
            Arg::new("path")
                .help("Directory to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("setup")
                .long("setup")
                .action(ArgAction::SetTrue)
                .help(format!("Re-run the setup screen even if {CONFIG_FILENAME} exists")),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored output"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the tally as JSON instead of the report"),
        )
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let matches = build_command().get_matches();

    if matches.get_flag("no-color") || std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
    }

    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let root = fs::canonicalize(&path)
        .with_context(|| format!("cannot access {}", path.display()))?;
    if !root.is_dir() {
        return Err(TallymanError::NotADirectory(root).into());
    }

    let matcher = load_gitignore(&root);

    // Load or create the configuration. The nearest enclosing config is
    // authoritative; the first run (or --setup) gathers it interactively.
    let config_path = root.join(CONFIG_FILENAME);
    let existing = find_config(&root);

    let config = match &existing {
        Some(found) if !matches.get_flag("setup") => load_config(found)?,
        _ => {
            let seed = existing
                .as_deref()
                .map(|found| load_config(found).unwrap_or_default())
                .unwrap_or_default();
            match setup::run_setup(&root, &matcher, &seed.excluded_dirs, &seed.spec_dirs)? {
                Some((excluded_dirs, spec_dirs)) => {
                    save_config(&config_path, &excluded_dirs, &spec_dirs)?;
                    TallyConfig {
                        excluded_dirs,
                        spec_dirs,
                    }
                }
                None => {
                    println!("Setup cancelled.");
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }
    };

    let files = walk_project(&root, &config.excluded_dirs, &matcher, &config.spec_dirs);
    let tally = aggregate(
        files
            .iter()
            .map(|(file_path, language)| (*language, count_lines(file_path, language))),
    );

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&tally)?);
    } else {
        let directory = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        display::display_results(&tally, &directory);
    }

    Ok(ExitCode::SUCCESS)
}
