use std::path::PathBuf;

use thiserror::Error;

use crate::tools::RequiredTool;

/// Stderr marker used when a failing command wrote nothing to stderr.
pub const NO_ERROR_OUTPUT: &str = "no error output";

#[derive(Debug, Error)]
pub enum OcmError {
    #[error("config not found: {} (run 'ocm-env config init')", .0.display())]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, OcmError>;

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` {}: {stderr}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl ShellError {
    pub fn command(&self) -> &str {
        match self {
            ShellError::Spawn { command, .. } | ShellError::Failed { command, .. } => command,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "terminated by signal".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parsing CLI output
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("hub init output has no `clusteradm` line containing `<cluster_name>`")]
    MissingJoinTemplate,

    #[error("unrecognized clusteradm version output: {0:?}")]
    MalformedVersion(String),
}

// ---------------------------------------------------------------------------
// Tool verification
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("missing required tools: {}", tool_names(.0))]
    ToolsMissing(Vec<RequiredTool>),
}

impl VerifyError {
    pub fn missing(&self) -> &[RequiredTool] {
        match self {
            VerifyError::ToolsMissing(tools) => tools,
        }
    }
}

fn tool_names(tools: &[RequiredTool]) -> String {
    tools.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("clusteradm is not installed")]
    NotInstalled,

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// Environment build
// ---------------------------------------------------------------------------

/// Failure of a single hub initialization step.
#[derive(Debug, Error)]
pub enum HubInitError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Stage-level build failure. `Display` is the message shown to the user;
/// the failing command, if any, is kept as the error source.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("required 1 hub and at least 1 managed cluster, found {hubs} and {managed}")]
    Precondition { hubs: usize, managed: usize },

    #[error("invalid cluster name {name:?}: use lowercase letters, digits, '-' and '.'")]
    InvalidName { name: String },

    #[error("failed creating kind clusters")]
    CreateClusters {
        failed: Vec<String>,
        #[source]
        source: ShellError,
    },

    #[error("failed initializing the hub cluster")]
    InitHub {
        #[source]
        source: HubInitError,
    },

    #[error("failed to issue join requests")]
    IssueJoin {
        cluster: String,
        #[source]
        source: ShellError,
    },

    #[error("failed to accept join requests")]
    AcceptJoin {
        #[source]
        source: ShellError,
    },

    #[error("build cancelled")]
    Cancelled { before: crate::builder::Stage },
}

impl BuildError {
    /// The stage the pipeline was in when it failed.
    pub fn stage(&self) -> crate::builder::Stage {
        use crate::builder::Stage;
        match self {
            BuildError::Precondition { .. } | BuildError::InvalidName { .. } => Stage::Validating,
            BuildError::CreateClusters { .. } => Stage::CreatingClusters,
            BuildError::InitHub { .. } => Stage::InitializingHub,
            BuildError::IssueJoin { .. } => Stage::IssuingJoinRequests,
            BuildError::AcceptJoin { .. } => Stage::AcceptingJoinRequests,
            BuildError::Cancelled { before } => *before,
        }
    }

    /// Whether any `kind create cluster` command may have run before the failure.
    pub fn clusters_may_exist(&self) -> bool {
        use crate::builder::Stage;
        match self {
            BuildError::Precondition { .. } | BuildError::InvalidName { .. } => false,
            BuildError::Cancelled { before } => {
                !matches!(before, Stage::Validating | Stage::CreatingClusters)
            }
            _ => true,
        }
    }
}

/// A [`BuildError`] as surfaced to the caller, prefixed with the brand tag.
#[derive(Debug)]
pub struct BuildFailure {
    brand: String,
    error: BuildError,
}

impl BuildFailure {
    pub(crate) fn new(brand: impl Into<String>, error: BuildError) -> Self {
        Self {
            brand: brand.into(),
            error,
        }
    }

    pub fn error(&self) -> &BuildError {
        &self.error
    }
}

impl std::fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.brand, self.error)
    }
}

impl std::error::Error for BuildFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}
