use crate::output::print_json;
use anyhow::Context;
use ocm_env_core::version::clusteradm_version;
use ocm_env_core::{PathProbe, SystemShell};

pub fn run(json: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let version = rt
        .block_on(clusteradm_version(&SystemShell, &PathProbe::new()))
        .context("unable to detect clusteradm version")?;

    if json {
        return print_json(&version);
    }

    println!("clusteradm client version: {}", version.client);
    match &version.server {
        Some(server) => println!("clusteradm server version: {server}"),
        None => println!("clusteradm server version: (no hub reachable)"),
    }
    Ok(())
}
