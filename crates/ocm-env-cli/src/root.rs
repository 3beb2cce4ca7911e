use ocm_env_core::config::CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Resolve the directory holding `ocm-env.yaml`.
///
/// Priority:
/// 1. `--root` flag / `OCM_ENV_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `ocm-env.yaml`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(explicit, &cwd)
}

fn resolve_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    cwd.ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .unwrap_or(cwd)
        .to_path_buf()
}
