use serde::Serialize;

/// An external executable the environment build shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredTool {
    pub name: &'static str,
    /// Shown only when the tool is missing.
    pub install_hint: &'static str,
}

pub const REQUIRED_TOOLS: &[RequiredTool] = &[
    RequiredTool {
        name: "kubectl",
        install_hint: "https://kubernetes.io/docs/tasks/tools/#kubectl",
    },
    RequiredTool {
        name: "clusteradm",
        install_hint: "https://github.com/open-cluster-management-io/clusteradm#install-the-clusteradm-command-line",
    },
    RequiredTool {
        name: "kind",
        install_hint: "https://kind.sigs.k8s.io/docs/user/quick-start/#installation",
    },
];
