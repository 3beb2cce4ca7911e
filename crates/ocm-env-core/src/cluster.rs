//! Cluster topology model.
//!
//! A [`Topology`] is the ordered set of kind clusters a build creates: one
//! hub and any number of managed clusters. Names are unique; the first
//! cluster added under a given name wins.

use serde::{Deserialize, Serialize};

/// Prefix kind puts in front of a cluster name to form its kube-context.
pub const KIND_CONTEXT_PREFIX: &str = "kind-";

pub const DEFAULT_HUB: &str = "hub";
pub const DEFAULT_MANAGED_COUNT: usize = 2;

/// Whether `name` is usable as a kind cluster name: non-empty, made of
/// lowercase ASCII letters, digits, `-` and `.`.
///
/// Names end up inside `sh -c` command lines, so anything else is rejected
/// before a single command runs.
pub fn is_valid_cluster_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hub,
    Managed,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hub => "hub",
            Role::Managed => "managed",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSpec {
    name: String,
    role: Role,
}

impl ClusterSpec {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn hub(name: impl Into<String>) -> Self {
        Self::new(name, Role::Hub)
    }

    pub fn managed(name: impl Into<String>) -> Self {
        Self::new(name, Role::Managed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn has_valid_name(&self) -> bool {
        is_valid_cluster_name(&self.name)
    }

    /// The kube-context kind registers for this cluster.
    pub fn context(&self) -> String {
        format!("{KIND_CONTEXT_PREFIX}{}", self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    clusters: Vec<ClusterSpec>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hub `hub` with managed clusters `cluster1` and `cluster2`.
    pub fn default_local() -> Self {
        Self::with_standard_names(DEFAULT_HUB, DEFAULT_MANAGED_COUNT)
    }

    /// A hub plus `count` managed clusters named `cluster1..clusterN`.
    pub fn with_standard_names(hub: impl Into<String>, count: usize) -> Self {
        Self::from_names(hub, (1..=count).map(|idx| format!("cluster{idx}")))
    }

    pub fn from_names<I, S>(hub: impl Into<String>, managed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(ClusterSpec::hub(hub))
            .chain(managed.into_iter().map(ClusterSpec::managed))
            .collect()
    }

    /// Add a cluster. Returns `false` and keeps the existing entry if the
    /// name is already taken.
    pub fn push(&mut self, cluster: ClusterSpec) -> bool {
        if self.contains(cluster.name()) {
            return false;
        }
        self.clusters.push(cluster);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clusters.iter().any(|c| c.name == name)
    }

    pub fn clusters(&self) -> &[ClusterSpec] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn hubs(&self) -> impl Iterator<Item = &ClusterSpec> {
        self.by_role(Role::Hub)
    }

    pub fn managed(&self) -> impl Iterator<Item = &ClusterSpec> {
        self.by_role(Role::Managed)
    }

    fn by_role(&self, role: Role) -> impl Iterator<Item = &ClusterSpec> {
        self.clusters.iter().filter(move |c| c.role == role)
    }
}

impl FromIterator<ClusterSpec> for Topology {
    fn from_iter<T: IntoIterator<Item = ClusterSpec>>(iter: T) -> Self {
        let mut topology = Topology::new();
        for cluster in iter {
            topology.push(cluster);
        }
        topology
    }
}
