use std::path::{Path, PathBuf};

mod check;
mod compat;
mod terminal;

use bloodlink::{BloodType, Config};
use check::{CheckRegistration, CheckRequest};
use clap::ArgAction;
use compat::Compat;
use serde::de::DeserializeOwned;
use tracing::instrument;

/// The configuration file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "bloodlink.toml";

/// Parse a blood type, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts `o-` or ` ab+ ` for
/// convenience. The library itself only accepts the exact forms.
fn parse_blood_type(s: &str) -> Result<BloodType, String> {
    s.trim().to_uppercase().parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(self.config.as_deref())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show which blood types a donor can give to
    ///
    /// With --donors, show which donors can give to a recipient instead.
    Compat(Compat),

    /// Validate a blood request draft (TOML or JSON)
    CheckRequest(CheckRequest),

    /// Validate registration data (TOML or JSON) for a role
    CheckRegistration(CheckRegistration),

    /// Write a default configuration file
    Init,
}

impl Command {
    fn run(self, config_path: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Compat(command) => command.run()?,
            Self::CheckRequest(command) => command.run(&load_config(config_path)?)?,
            Self::CheckRegistration(command) => command.run(&load_config(config_path)?)?,
            Self::Init => init(config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG)))?,
        }
        Ok(())
    }
}

/// Loads the configuration named on the command line, or the default file if
/// it exists, or the built-in defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Ok(Config::load(Path::new(DEFAULT_CONFIG))?)
        }
        None => {
            tracing::debug!("No configuration file, using defaults");
            Ok(Config::default())
        }
    }
}

#[instrument]
fn init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration already exists at {}", path.display());
    }

    Config::default().save(path)?;

    println!("Created {}", path.display());
    Ok(())
}

/// Reads a TOML or JSON document, chosen by file extension.
fn load_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))
    } else {
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bloodlink::RequestDraft;

    use super::*;

    #[test]
    fn blood_type_is_normalized_at_the_boundary() {
        assert_eq!(parse_blood_type(" ab- "), Ok(BloodType::ABNegative));
        assert!(parse_blood_type("c+").is_err());
    }

    #[test]
    fn loads_json_and_toml_drafts() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(br#"{"bloodGroup":"B-","unitsNeeded":"3"}"#)
            .unwrap();
        let draft: RequestDraft = load_document(json.path()).unwrap();
        assert_eq!(draft.blood_group, "B-");

        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        toml.write_all(b"bloodGroup = \"O+\"\nurgency = \"low\"\n")
            .unwrap();
        let draft: RequestDraft = load_document(toml.path()).unwrap();
        assert_eq!(draft.blood_group, "O+");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG);

        init(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(init(&path).is_err());
    }
}
