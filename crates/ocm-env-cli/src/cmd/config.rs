use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use ocm_env_core::config::{config_path, EnvConfig, WarnLevel};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a default ocm-env.yaml (1 hub, 2 managed clusters)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration and the cluster layout it builds
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init { force } => init(root, force),
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path, force: bool) -> anyhow::Result<()> {
    let path = config_path(root);
    if path.exists() && !force {
        println!("exists:  {}", path.display());
        return Ok(());
    }
    EnvConfig::default()
        .save(root)
        .context("failed to write ocm-env.yaml")?;
    println!("created: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = EnvConfig::load_or_default(root).context("failed to load config")?;
    let topology = config.topology();

    if json {
        let clusters: Vec<_> = topology
            .clusters()
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name(),
                    "role": c.role(),
                    "context": c.context(),
                })
            })
            .collect();
        let value = serde_json::json!({
            "config": config,
            "clusters": clusters,
        });
        return print_json(&value);
    }

    println!("Brand:               {}", config.brand);
    println!("Teardown on failure: {}", config.teardown_on_failure);
    println!();
    let rows = topology
        .clusters()
        .iter()
        .map(|c| vec![c.name().to_string(), c.role().to_string(), c.context()])
        .collect();
    print_table(&["NAME", "ROLE", "CONTEXT"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = EnvConfig::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
