//! Join command extraction from `clusteradm init` output.
//!
//! `clusteradm init --use-bootstrap-token` prints a banner followed by the
//! command managed clusters run to request membership, with a
//! `<cluster_name>` placeholder:
//!
//! ```text
//! The multicluster hub control plane has been initialized successfully!
//!
//! You can now register cluster(s) to the hub control plane. ...
//!
//!     clusteradm join --hub-token xyz --hub-apiserver https://127.0.0.1:1234 --cluster-name <cluster_name>
//!
//! Replace <cluster_name> with a cluster name of your choice. For example, cluster1.
//! ```
//!
//! The template is the first `clusteradm` line carrying the placeholder,
//! wherever it appears in the output.

use crate::error::ParseError;

pub const CLUSTER_NAME_PLACEHOLDER: &str = "<cluster_name>";

/// Flags appended to every join command.
pub const JOIN_FLAGS: &str = "--force-internal-endpoint-lookup --wait";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTemplate(String);

impl JoinTemplate {
    pub fn parse(hub_init_output: &str) -> Result<Self, ParseError> {
        hub_init_output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| line.starts_with("clusteradm") && line.contains(CLUSTER_NAME_PLACEHOLDER))
            .map(|line| JoinTemplate(line.to_string()))
            .ok_or(ParseError::MissingJoinTemplate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full join command for the managed cluster `cluster_name`.
    pub fn command_for(&self, cluster_name: &str) -> String {
        let join = self.0.replace(CLUSTER_NAME_PLACEHOLDER, cluster_name);
        format!("{} {JOIN_FLAGS}", join.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOIN: &str = "clusteradm join --hub-token xyzxyz --hub-apiserver https://127.0.0.1:1234 --cluster-name";

    fn banner() -> String {
        format!(
            "The multicluster hub control plane has been initialized successfully!\n\
             \n\
             \tYou can now register cluster(s) to the hub control plane. Log onto those cluster(s) and run the following command:\n\
             \n\
             \t\t{JOIN} <cluster_name>\n\
             \n\
             \tReplace <cluster_name> with a cluster name of your choice. For example, cluster1.\n\
             \n\t"
        )
    }

    #[test]
    fn extracts_template_from_banner() {
        let template = JoinTemplate::parse(&banner()).unwrap();
        assert_eq!(template.as_str(), format!("{JOIN} <cluster_name>"));
    }

    #[test]
    fn substitutes_name_and_appends_flags() {
        let template = JoinTemplate::parse(&banner()).unwrap();
        assert_eq!(
            template.command_for("cluster1"),
            format!("{JOIN} cluster1 --force-internal-endpoint-lookup --wait")
        );
    }

    #[test]
    fn tolerates_extra_banner_lines() {
        let output = format!("W0101 00:00:00 some warning\nCRDs installed\n\n{}", banner());
        let template = JoinTemplate::parse(&output).unwrap();
        assert!(template.as_str().starts_with("clusteradm join"));
    }

    #[test]
    fn placeholder_only_in_prose_is_a_parse_error() {
        let output = "done\n\nReplace <cluster_name> with a cluster name of your choice.\n";
        assert_eq!(
            JoinTemplate::parse(output),
            Err(ParseError::MissingJoinTemplate)
        );
        assert_eq!(JoinTemplate::parse(""), Err(ParseError::MissingJoinTemplate));
    }
}
