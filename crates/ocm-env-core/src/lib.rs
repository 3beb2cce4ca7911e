//! `ocm-env-core`: bring up a local Open Cluster Management environment.
//!
//! ```text
//! Topology ──► verify_tools(PathProbe, REQUIRED_TOOLS)
//!     │
//!     ▼
//! EnvironmentBuilder<SystemShell>::build(&topology, on_progress)
//!     │   kind create cluster ×N      (concurrent)
//!     │   clusteradm init             (hub context)
//!     │   clusteradm join ×M          (sequential, per managed context)
//!     │   clusteradm accept           (hub context, once)
//!     ▼
//! Result<String, BuildFailure>
//! ```

pub mod builder;
pub mod cluster;
pub mod config;
pub mod error;
pub mod join;
pub mod probe;
pub mod progress;
pub mod shell;
pub mod tools;
pub mod verify;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{EnvironmentBuilder, Stage};
pub use cluster::{ClusterSpec, Role, Topology};
pub use error::{BuildError, BuildFailure, OcmError, Result, ShellError, VerifyError};
pub use probe::{PathProbe, ToolProbe};
pub use progress::{CancelToken, ProgressEvent};
pub use shell::{ShellRunner, SystemShell};
pub use tools::{RequiredTool, REQUIRED_TOOLS};
pub use verify::verify_tools;
