//! # Mirror Command Implementation
//!
//! This module implements the `mirror` subcommand, which manages the mirror
//! rules in `<home>/mirrors.yaml`.
//!
//! ## Functionality
//!
//! - **`--add`**: add or replace the mirror for `-p` with `-r`/`-s`
//! - **`--remove`**: drop the mirror for `-p`
//! - **`--list`**: print every configured mirror (optionally as JSON)
//! - **`--examples`**: print usage examples and exit
//!
//! Exactly one of `--add`, `--remove`, `--list` is accepted per invocation.
//! The flags are checked before the mirror file is touched.
//!
//! A failure to write the file is logged as a warning and the command still
//! succeeds, unless `--strict` is given. A file that exists but cannot be
//! parsed always fails the command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dep_mirror::defaults::{DEFAULT_VCS, HOME_ENV_VAR, MIRRORS_FILENAME};
use dep_mirror::error::Error;
use dep_mirror::home;
use dep_mirror::mirrors::{MirrorDocument, MirrorEntry};
use dep_mirror::operations::{self, AddOutcome, RemoveOutcome};
use dep_mirror::output::{OutputConfig, Status};

pub const LONG_HELP: &str = r#"Mirror config for vendor project.

Manages the mirror rules dep consults before fetching a package. Rules are
stored in "$HOME/.dep/mirrors.yaml", for example:

repos:
- prefix: golang.org/x/sys
  repo: https://github.com/golang/sys.git
  vcs: git
- prefix: cloud.google.com/go
  repo: https://github.com/googleapis/google-cloud-go.git
  vcs: git

When dependencies are resolved, a package whose path matches a prefix is
fetched from the mirror repository instead of its canonical location.

Long flags take two dashes: use --add, --remove, --list and --examples
(not -add, -remove, -list or -examples). The short -p, -r and -s are
unchanged."#;

const EXAMPLES: &str = r#"
dep mirror --list

    Show every configured mirror.

dep mirror --add -p k8s.io/apimachinery -r https://github.com/kubernetes/apimachinery.git -s git

    Fetch k8s.io/apimachinery from the given GitHub repository.
    Running it again with a different -r replaces the existing rule.

dep mirror --remove -p k8s.io/apimachinery

    Stop mirroring k8s.io/apimachinery.
"#;

/// Manage package mirrors
#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// Print detailed usage examples
    #[arg(long)]
    pub examples: bool,

    /// Add mirror to the mirror file
    #[arg(long)]
    pub add: bool,

    /// Remove mirror from the mirror file
    #[arg(long)]
    pub remove: bool,

    /// List all mirrors in the mirror file
    #[arg(long)]
    pub list: bool,

    /// Package prefix to mirror
    #[arg(short = 'p', long, value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Mirror repository for the package
    #[arg(short = 'r', long, value_name = "REPO", default_value = "")]
    pub repo: String,

    /// VCS of the mirror repository
    #[arg(short = 's', long, value_name = "VCS", default_value = DEFAULT_VCS)]
    pub vcs: String,

    /// Print the mirror list as JSON (with --list)
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Fail the command when the mirror file cannot be written
    #[arg(long)]
    pub strict: bool,

    /// Directory holding mirrors.yaml.
    ///
    /// Defaults to `~/.dep`, falling back to `.dep` under the current
    /// directory when the home directory cannot be determined.
    #[arg(long, value_name = "DIR", env = HOME_ENV_VAR)]
    pub home: Option<PathBuf>,
}

/// The validated request of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MirrorAction {
    Add(MirrorEntry),
    Remove(String),
    List { json: bool },
}

/// Execute the `mirror` command.
pub fn execute(args: MirrorArgs, output: &OutputConfig) -> Result<()> {
    if args.examples {
        println!("{}", EXAMPLES.trim());
        return Ok(());
    }

    let action = validate(&args)?;

    let home_dir = args
        .home
        .clone()
        .unwrap_or_else(|| home::home().to_path_buf());
    let path = home::mirrors_path(&home_dir);
    log::debug!("Using mirror file {}", path.display());

    match action {
        MirrorAction::Add(entry) => execute_add(&path, entry, args.strict, output),
        MirrorAction::Remove(prefix) => execute_remove(&path, &prefix, args.strict, output),
        MirrorAction::List { json } => execute_list(&path, json, output),
    }
}

/// Checks the flag combination before any file access.
fn validate(args: &MirrorArgs) -> std::result::Result<MirrorAction, Error> {
    let requested = [args.add, args.remove, args.list]
        .iter()
        .filter(|flag| **flag)
        .count();

    if requested > 1 {
        return Err(Error::usage("cannot pass more than one of --add, --remove and --list"));
    }

    if args.add {
        if args.prefix.is_empty() {
            return Err(Error::usage("--add requires a package prefix (-p)"));
        }
        if args.repo.is_empty() {
            return Err(Error::usage("--add requires a mirror repository (-r)"));
        }
        return Ok(MirrorAction::Add(MirrorEntry::new(
            args.prefix.as_str(),
            args.repo.as_str(),
            args.vcs.as_str(),
        )));
    }

    if args.remove {
        if args.prefix.is_empty() {
            return Err(Error::usage("--remove requires a package prefix (-p)"));
        }
        return Ok(MirrorAction::Remove(args.prefix.clone()));
    }

    if args.list {
        return Ok(MirrorAction::List { json: args.json });
    }

    Err(Error::usage("one of --add, --remove or --list is required"))
}

fn execute_add(path: &Path, entry: MirrorEntry, strict: bool, output: &OutputConfig) -> Result<()> {
    let prefix = entry.prefix.clone();
    let repo = entry.repo.clone();

    let pending = operations::prepare_add(path, entry)?;
    for line in add_messages(&pending.outcome(), &prefix, &repo) {
        println!("{}", line);
    }

    match pending.commit(path) {
        Ok(_) => {
            println!("{}", written_message(output));
            Ok(())
        }
        Err(e) => handle_write_failure(e, strict),
    }
}

fn execute_remove(path: &Path, prefix: &str, strict: bool, output: &OutputConfig) -> Result<()> {
    match operations::remove(path, prefix) {
        Ok(RemoveOutcome::NoFile) => {
            println!(
                "{}",
                output.status(Status::Missing, &format!("{} file not found", MIRRORS_FILENAME))
            );
            Ok(())
        }
        Ok(RemoveOutcome::NotFound) => {
            println!(
                "{}",
                output.status(Status::Missing, &format!("{} was not found in mirrors", prefix))
            );
            Ok(())
        }
        Ok(RemoveOutcome::Removed) => {
            println!("{} was removed from mirrors", prefix);
            println!("{}", written_message(output));
            Ok(())
        }
        Err(e) => handle_write_failure(e, strict),
    }
}

fn execute_list(path: &Path, json: bool, output: &OutputConfig) -> Result<()> {
    let document = operations::list(path)?;

    if json {
        let repos = document.map(|d| d.repos).unwrap_or_default();
        let rendered = serde_json::to_string_pretty(&repos).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    for line in list_lines(document.as_ref(), output) {
        println!("{}", line);
    }
    Ok(())
}

/// Write failures are downgraded to a warning unless `strict` is set. Every
/// other error is returned.
fn handle_write_failure(error: Error, strict: bool) -> Result<()> {
    if !error.is_write() {
        return Err(error.into());
    }
    if strict {
        return Err(error).context("mirror change was not saved");
    }
    log::warn!("{}", error);
    Ok(())
}

fn written_message(output: &OutputConfig) -> String {
    output.status(Status::Success, &format!("{} written with changes", MIRRORS_FILENAME))
}

fn add_messages(outcome: &AddOutcome, prefix: &str, repo: &str) -> Vec<String> {
    let mut lines = Vec::new();
    match outcome {
        AddOutcome::Created { new_file: true } => {
            lines.push(format!("No {} file exists. Creating new one", MIRRORS_FILENAME));
        }
        AddOutcome::Created { new_file: false } => {}
        AddOutcome::Replaced => {
            lines.push(format!("{} found in mirrors. Replacing with new settings", prefix));
        }
    }
    lines.push(format!("{} being set to {}", prefix, repo));
    lines
}

fn list_lines(document: Option<&MirrorDocument>, output: &OutputConfig) -> Vec<String> {
    match document {
        Some(document) if !document.is_empty() => {
            let mut lines = vec!["Mirrors...".to_string()];
            lines.extend(document.repos.iter().map(|entry| format!("--> {}", entry)));
            lines
        }
        _ => vec![output.status(Status::Info, "No mirrors found")],
    }
}
