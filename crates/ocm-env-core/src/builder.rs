//! Local OCM environment bring-up.
//!
//! # Pipeline
//!
//! ```text
//! Validating ─► CreatingClusters ─► InitializingHub ─► IssuingJoinRequests ─► AcceptingJoinRequests ─► Succeeded
//!      │               │                  │                    │                       │
//!      └───────────────┴──────────────────┴────────────────────┴───────────────────────┴─────► Failed
//! ```
//!
//! Cluster creation fans out over every cluster and waits for all of them.
//! Join requests run one managed cluster at a time. Every command that
//! depends on the active kube-context is preceded by an explicit
//! `kubectl config use` while the context lock is held.
//!
//! Progress increments are `0, 20, 20, 20` at the stage boundaries and `100`
//! at the terminal state, whether it is a success or a failure.

use futures::future::join_all;
use tokio::sync::Mutex;

use crate::cluster::{ClusterSpec, Topology};
use crate::error::{BuildError, BuildFailure, HubInitError, ShellError};
use crate::join::JoinTemplate;
use crate::progress::{CancelToken, ProgressEvent};
use crate::shell::ShellRunner;

pub const DEFAULT_BRAND: &str = "OCM extension";
pub const BUILD_SUCCEEDED: &str = "successfully created your local environment, have fun";

const STAGE_INCREMENT: u8 = 20;
const TERMINAL_INCREMENT: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    CreatingClusters,
    InitializingHub,
    IssuingJoinRequests,
    AcceptingJoinRequests,
    Succeeded,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::CreatingClusters => "creating_clusters",
            Stage::InitializingHub => "initializing_hub",
            Stage::IssuingJoinRequests => "issuing_join_requests",
            Stage::AcceptingJoinRequests => "accepting_join_requests",
            Stage::Succeeded => "succeeded",
        }
    }
}

pub struct EnvironmentBuilder<S> {
    shell: S,
    /// Held for the duration of every context-dependent command.
    kube_context: Mutex<()>,
    brand: String,
    teardown_on_failure: bool,
    cancel: Option<CancelToken>,
}

impl<S: ShellRunner> EnvironmentBuilder<S> {
    pub fn new(shell: S) -> Self {
        Self {
            shell,
            kube_context: Mutex::new(()),
            brand: DEFAULT_BRAND.to_string(),
            teardown_on_failure: false,
            cancel: None,
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Delete every cluster of the topology when a build fails after
    /// cluster creation started.
    pub fn teardown_on_failure(mut self, enabled: bool) -> Self {
        self.teardown_on_failure = enabled;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bring up `topology`, reporting progress through `on_progress`.
    ///
    /// Exactly one 100% event is emitted, carrying the success or failure
    /// message. On failure it is emitted before any teardown starts. The
    /// returned message and error are prefixed with the brand tag.
    pub async fn build<F>(&self, topology: &Topology, mut on_progress: F) -> Result<String, BuildFailure>
    where
        F: FnMut(ProgressEvent),
    {
        match self.run_stages(topology, &mut on_progress).await {
            Ok(()) => {
                tracing::info!(stage = Stage::Succeeded.as_str(), "{BUILD_SUCCEEDED}");
                on_progress(ProgressEvent::new(TERMINAL_INCREMENT, BUILD_SUCCEEDED));
                Ok(format!("{}, {BUILD_SUCCEEDED}", self.brand))
            }
            Err(err) => {
                match std::error::Error::source(&err) {
                    Some(cause) => tracing::error!(
                        stage = err.stage().as_str(),
                        cause = %cause,
                        "{err}"
                    ),
                    None => tracing::error!(stage = err.stage().as_str(), "{err}"),
                }
                on_progress(ProgressEvent::new(TERMINAL_INCREMENT, err.to_string()));
                if self.teardown_on_failure && err.clusters_may_exist() {
                    self.teardown(topology).await;
                }
                Err(BuildFailure::new(self.brand.clone(), err))
            }
        }
    }

    async fn run_stages<F>(&self, topology: &Topology, on_progress: &mut F) -> Result<(), BuildError>
    where
        F: FnMut(ProgressEvent),
    {
        let (hub, managed) = validate(topology)?;

        self.checkpoint(Stage::CreatingClusters)?;
        on_progress(ProgressEvent::new(
            0,
            format!("creating {} kind clusters", topology.len()),
        ));
        self.create_clusters(topology).await?;

        self.checkpoint(Stage::InitializingHub)?;
        on_progress(ProgressEvent::new(
            STAGE_INCREMENT,
            format!("initializing the Hub cluster named {}", hub.name()),
        ));
        let template = self
            .initialize_hub(hub)
            .await
            .map_err(|source| BuildError::InitHub { source })?;

        self.checkpoint(Stage::IssuingJoinRequests)?;
        on_progress(ProgressEvent::new(
            STAGE_INCREMENT,
            "issuing join requests for the managed clusters",
        ));
        self.issue_join_requests(&template, &managed).await?;

        self.checkpoint(Stage::AcceptingJoinRequests)?;
        on_progress(ProgressEvent::new(
            STAGE_INCREMENT,
            "accepting the managed clusters join request from the hub cluster",
        ));
        self.accept_join_requests(hub, &managed)
            .await
            .map_err(|source| BuildError::AcceptJoin { source })?;

        Ok(())
    }

    fn checkpoint(&self, next: Stage) -> Result<(), BuildError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(BuildError::Cancelled { before: next });
        }
        tracing::info!(stage = next.as_str(), "entering stage");
        Ok(())
    }

    async fn create_clusters(&self, topology: &Topology) -> Result<(), BuildError> {
        let creations = topology.clusters().iter().map(|cluster| async move {
            let command = format!("kind create cluster --name {}", cluster.name());
            (cluster.name(), self.shell.run(&command).await)
        });

        let mut failed = Vec::new();
        let mut first_error = None;
        for (name, result) in join_all(creations).await {
            match result {
                Ok(_) => tracing::debug!(cluster = name, "kind cluster created"),
                Err(e) => {
                    tracing::warn!(cluster = name, error = %e, "kind cluster creation failed");
                    failed.push(name.to_string());
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some(source) => Err(BuildError::CreateClusters { failed, source }),
        }
    }

    async fn initialize_hub(&self, hub: &ClusterSpec) -> Result<JoinTemplate, HubInitError> {
        let output = self
            .in_context(hub, "clusteradm init --use-bootstrap-token")
            .await?;
        let template = JoinTemplate::parse(&output)?;
        tracing::debug!(template = template.as_str(), "join template extracted");
        Ok(template)
    }

    async fn issue_join_requests(
        &self,
        template: &JoinTemplate,
        managed: &[&ClusterSpec],
    ) -> Result<(), BuildError> {
        for cluster in managed {
            let command = template.command_for(cluster.name());
            self.in_context(cluster, &command)
                .await
                .map_err(|source| BuildError::IssueJoin {
                    cluster: cluster.name().to_string(),
                    source,
                })?;
            tracing::debug!(cluster = cluster.name(), "join request issued");
        }
        Ok(())
    }

    async fn accept_join_requests(
        &self,
        hub: &ClusterSpec,
        managed: &[&ClusterSpec],
    ) -> Result<String, ShellError> {
        let names = managed
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(",");
        self.in_context(hub, &format!("clusteradm accept --clusters {names} --wait"))
            .await
    }

    /// Switch to `cluster`'s context and run `command` while holding the
    /// context lock.
    async fn in_context(&self, cluster: &ClusterSpec, command: &str) -> Result<String, ShellError> {
        let _guard = self.kube_context.lock().await;
        self.shell
            .run(&format!("kubectl config use {}", cluster.context()))
            .await?;
        self.shell.run(command).await
    }

    async fn teardown(&self, topology: &Topology) {
        tracing::info!(clusters = topology.len(), "tearing down kind clusters");
        let deletions = topology.clusters().iter().map(|cluster| async move {
            let command = format!("kind delete cluster --name {}", cluster.name());
            if let Err(e) = self.shell.run(&command).await {
                tracing::warn!(cluster = cluster.name(), error = %e, "teardown failed");
            }
        });
        join_all(deletions).await;
    }
}

/// Split the topology into its single hub and its managed clusters.
fn validate(topology: &Topology) -> Result<(&ClusterSpec, Vec<&ClusterSpec>), BuildError> {
    if let Some(bad) = topology.clusters().iter().find(|c| !c.has_valid_name()) {
        return Err(BuildError::InvalidName {
            name: bad.name().to_string(),
        });
    }
    let hubs: Vec<_> = topology.hubs().collect();
    let managed: Vec<_> = topology.managed().collect();
    match hubs.as_slice() {
        [hub] if !managed.is_empty() => Ok((*hub, managed)),
        _ => Err(BuildError::Precondition {
            hubs: hubs.len(),
            managed: managed.len(),
        }),
    }
}
