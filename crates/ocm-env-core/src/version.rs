use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{ParseError, VersionError};
use crate::probe::ToolProbe;
use crate::shell::ShellRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteradmVersion {
    pub client: String,
    /// Absent when no hub is reachable from the current context.
    pub server: Option<String>,
}

fn version_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(client|server)\b[^:\n]*:[ \t]*(\S*)").expect("valid regex")
    })
}

/// Parse `clusteradm version` output:
///
/// ```text
/// client          version :v0.8.1
/// server release  version :v1.0.0
/// ```
pub fn parse_clusteradm_version(stdout: &str) -> Result<ClusteradmVersion, ParseError> {
    let mut client = None;
    let mut server = None;

    for caps in version_line().captures_iter(stdout) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        match &caps[1] {
            "client" => client = client.or_else(|| Some(value.to_string())),
            _ => server = server.or_else(|| Some(value.to_string())),
        }
    }

    let client = client.ok_or_else(|| ParseError::MalformedVersion(stdout.trim().to_string()))?;
    Ok(ClusteradmVersion { client, server })
}

pub async fn clusteradm_version<S, P>(shell: &S, probe: &P) -> Result<ClusteradmVersion, VersionError>
where
    S: ShellRunner,
    P: ToolProbe,
{
    if !probe.exists("clusteradm").await {
        return Err(VersionError::NotInstalled);
    }
    let stdout = shell.run("clusteradm version").await?;
    Ok(parse_clusteradm_version(&stdout)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProbe, FakeShell};

    #[test]
    fn parses_client_and_server() {
        let out = "client\t\tversion\t:v0.8.1-0-g3aea9c5\nserver release\tversion\t:v1.0.0\n";
        let v = parse_clusteradm_version(out).unwrap();
        assert_eq!(v.client, "v0.8.1-0-g3aea9c5");
        assert_eq!(v.server.as_deref(), Some("v1.0.0"));
    }

    #[test]
    fn server_is_optional() {
        let out = "client\t\tversion\t:v0.8.1\nserver release\tversion\t:\n";
        let v = parse_clusteradm_version(out).unwrap();
        assert_eq!(v.client, "v0.8.1");
        assert_eq!(v.server, None);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_clusteradm_version("command not found\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedVersion("command not found".to_string())
        );
    }

    #[tokio::test]
    async fn missing_binary_skips_the_shell() {
        let shell = FakeShell::new();
        let probe = FakeProbe::with(["kind"]);
        let err = clusteradm_version(&shell, &probe).await.unwrap_err();
        assert!(matches!(err, VersionError::NotInstalled));
        assert!(shell.calls().is_empty());
    }

    #[tokio::test]
    async fn runs_version_command() {
        let shell = FakeShell::new().reply("clusteradm version", "client version :v0.9.0\n");
        let probe = FakeProbe::with(["clusteradm"]);
        let v = clusteradm_version(&shell, &probe).await.unwrap();
        assert_eq!(v.client, "v0.9.0");
        assert_eq!(shell.calls(), ["clusteradm version"]);
    }

    #[tokio::test]
    async fn command_failure_is_reported() {
        let shell = FakeShell::new().fail("clusteradm version", "boom");
        let probe = FakeProbe::with(["clusteradm"]);
        let err = clusteradm_version(&shell, &probe).await.unwrap_err();
        assert!(matches!(err, VersionError::Shell(_)));
    }
}
