use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::builder::DEFAULT_BRAND;
use crate::cluster::{is_valid_cluster_name, Topology, DEFAULT_HUB, DEFAULT_MANAGED_COUNT};
use crate::error::{OcmError, Result};

pub const CONFIG_FILE: &str = "ocm-env.yaml";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// EnvConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_hub")]
    pub hub: String,
    #[serde(default = "default_managed")]
    pub managed: Vec<String>,
    #[serde(default)]
    pub teardown_on_failure: bool,
    #[serde(default = "default_brand")]
    pub brand: String,
}

fn default_version() -> u32 {
    1
}

fn default_hub() -> String {
    DEFAULT_HUB.to_string()
}

fn default_managed() -> Vec<String> {
    (1..=DEFAULT_MANAGED_COUNT)
        .map(|idx| format!("cluster{idx}"))
        .collect()
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            hub: default_hub(),
            managed: default_managed(),
            teardown_on_failure: false,
            brand: default_brand(),
        }
    }
}

impl EnvConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Err(OcmError::ConfigNotFound(path));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// Like [`EnvConfig::load`], falling back to defaults when no config exists.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(OcmError::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = config_path(root);
        let data = serde_yaml::to_string(self)?;
        let dir = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    /// The deduplicated topology this config describes.
    pub fn topology(&self) -> Topology {
        Topology::from_names(self.hub.clone(), self.managed.iter().cloned())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };

        if self.hub.trim().is_empty() {
            error("hub name is empty".to_string());
        }
        if self.managed.is_empty() {
            error("at least one managed cluster is required".to_string());
        }
        if self.managed.iter().any(|m| m.trim().is_empty()) {
            error("managed cluster names must not be empty".to_string());
        }
        let named = std::iter::once(&self.hub).chain(&self.managed);
        for name in named.filter(|n| !n.trim().is_empty() && !is_valid_cluster_name(n)) {
            error(format!(
                "'{name}' is not a valid cluster name (lowercase letters, digits, '-' and '.')"
            ));
        }
        if self.managed.contains(&self.hub) {
            error(format!("'{}' is listed as both hub and managed cluster", self.hub));
        }

        let mut seen = HashSet::new();
        for name in &self.managed {
            if !seen.insert(name) && name != &self.hub {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("managed cluster '{name}' is listed more than once"),
                });
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn errors(cfg: &EnvConfig) -> Vec<String> {
        cfg.validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message)
            .collect()
    }

    #[test]
    fn default_matches_default_topology() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.topology(), Topology::default_local());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = EnvConfig {
            hub: "ctrl".into(),
            managed: vec!["edge1".into()],
            teardown_on_failure: true,
            ..EnvConfig::default()
        };
        cfg.save(dir.path()).unwrap();
        assert!(dir.path().join(CONFIG_FILE).exists());
        assert_eq!(EnvConfig::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn missing_config_is_reported_or_defaulted() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            EnvConfig::load(dir.path()),
            Err(OcmError::ConfigNotFound(_))
        ));
        assert_eq!(
            EnvConfig::load_or_default(dir.path()).unwrap(),
            EnvConfig::default()
        );
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "hub: central\n").unwrap();
        let cfg = EnvConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.hub, "central");
        assert_eq!(cfg.managed, ["cluster1", "cluster2"]);
        assert_eq!(cfg.brand, DEFAULT_BRAND);
        assert!(!cfg.teardown_on_failure);
    }

    #[test]
    fn validate_flags_unbuildable_layouts() {
        let cfg = EnvConfig {
            managed: vec![],
            ..EnvConfig::default()
        };
        assert_eq!(errors(&cfg), ["at least one managed cluster is required"]);

        let cfg = EnvConfig {
            managed: vec!["hub".into(), "c1".into()],
            ..EnvConfig::default()
        };
        assert_eq!(
            errors(&cfg),
            ["'hub' is listed as both hub and managed cluster"]
        );
    }

    #[test]
    fn validate_rejects_names_kind_cannot_use() {
        let cfg = EnvConfig {
            hub: "Hub".into(),
            managed: vec!["c1;x".into(), "a b".into(), "ok-1".into()],
            ..EnvConfig::default()
        };
        assert_eq!(
            errors(&cfg),
            [
                "'Hub' is not a valid cluster name (lowercase letters, digits, '-' and '.')",
                "'c1;x' is not a valid cluster name (lowercase letters, digits, '-' and '.')",
                "'a b' is not a valid cluster name (lowercase letters, digits, '-' and '.')",
            ]
        );

        let cfg = EnvConfig {
            hub: String::new(),
            ..EnvConfig::default()
        };
        assert_eq!(errors(&cfg), ["hub name is empty"]);
    }

    #[test]
    fn duplicate_managed_names_are_a_warning() {
        let cfg = EnvConfig {
            managed: vec!["c1".into(), "c1".into()],
            ..EnvConfig::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert_eq!(cfg.topology().len(), 2);
    }
}
