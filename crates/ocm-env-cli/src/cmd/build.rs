use crate::cmd::verify::missing_tools;
use crate::output::{print_json_line, ProgressPrinter};
use anyhow::Context;
use clap::Args;
use ocm_env_core::config::{EnvConfig, WarnLevel};
use ocm_env_core::{
    verify_tools, CancelToken, EnvironmentBuilder, PathProbe, SystemShell, REQUIRED_TOOLS,
};
use std::path::Path;

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Hub cluster name (default: from ocm-env.yaml, else "hub")
    #[arg(long)]
    hub: Option<String>,

    /// Managed cluster name; repeat for several (default: from ocm-env.yaml)
    #[arg(long = "managed", value_name = "NAME")]
    managed: Vec<String>,

    /// Create N managed clusters named cluster1..clusterN
    #[arg(long, value_name = "N", conflicts_with = "managed")]
    count: Option<usize>,

    /// Delete the kind clusters again if the build fails
    #[arg(long)]
    teardown_on_failure: bool,

    /// Skip the kubectl/clusteradm/kind pre-flight check
    #[arg(long)]
    skip_verify: bool,
}

pub fn run(root: &Path, args: BuildArgs, json: bool) -> anyhow::Result<()> {
    let config = EnvConfig::load_or_default(root).context("failed to load ocm-env.yaml")?;
    let config = effective_config(config, &args);
    check_config(&config)?;

    let topology = config.topology();
    let layout = topology
        .clusters()
        .iter()
        .map(|c| format!("{} ({})", c.name(), c.role()))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(clusters = %layout, "building local environment");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        if !args.skip_verify {
            verify_tools(&PathProbe::new(), REQUIRED_TOOLS)
                .await
                .map_err(|e| missing_tools(e, json))?;
        }

        let token = CancelToken::new();
        let on_interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, stopping after the current stage");
                on_interrupt.cancel();
            }
        });

        let builder = EnvironmentBuilder::new(SystemShell)
            .brand(config.brand.clone())
            .teardown_on_failure(config.teardown_on_failure)
            .cancel_token(token);

        let mut printer = ProgressPrinter::new(json);
        let result = builder
            .build(&topology, |event| printer.report(&event))
            .await;

        if json {
            let (ok, message) = match &result {
                Ok(message) => (true, message.clone()),
                Err(failure) => (false, failure.to_string()),
            };
            print_json_line(&serde_json::json!({ "ok": ok, "message": message }))?;
        }
        let message = result?;
        if !json {
            println!("{message}");
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// Flags win over ocm-env.yaml; `--count` wins over the configured names.
fn effective_config(config: EnvConfig, args: &BuildArgs) -> EnvConfig {
    let hub = args.hub.clone().unwrap_or(config.hub);
    let managed = match args.count {
        Some(count) => (1..=count).map(|idx| format!("cluster{idx}")).collect(),
        None if !args.managed.is_empty() => args.managed.clone(),
        None => config.managed,
    };
    EnvConfig {
        hub,
        managed,
        teardown_on_failure: args.teardown_on_failure || config.teardown_on_failure,
        ..config
    }
}

/// Refuse to start a build from a layout `config validate` would reject.
fn check_config(config: &EnvConfig) -> anyhow::Result<()> {
    let mut errors = Vec::new();
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => errors.push(w.message),
        }
    }
    if !errors.is_empty() {
        anyhow::bail!("invalid cluster layout: {}", errors.join("; "));
    }
    Ok(())
}
