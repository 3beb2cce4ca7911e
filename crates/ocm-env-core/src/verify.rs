//! Pre-flight check for the external tools a build needs.
//!
//! Every tool is probed concurrently and every probe is awaited; the check
//! passes only if all tools resolve, and a failure lists every missing tool.

use futures::future::join_all;

use crate::error::VerifyError;
use crate::probe::ToolProbe;
use crate::tools::RequiredTool;

pub const ALL_TOOLS_ACCESSIBLE: &str = "all tools are accessible, we're good to go";

pub async fn verify_tools<P: ToolProbe>(
    probe: &P,
    tools: &[RequiredTool],
) -> Result<String, VerifyError> {
    let probes = tools.iter().map(|tool| async move {
        let found = probe.exists(tool.name).await;
        (tool, found)
    });

    let missing: Vec<RequiredTool> = join_all(probes)
        .await
        .into_iter()
        .filter(|(_, found)| !found)
        .map(|(tool, _)| *tool)
        .collect();

    if missing.is_empty() {
        tracing::info!(count = tools.len(), "all required tools found");
        return Ok(ALL_TOOLS_ACCESSIBLE.to_string());
    }

    for tool in &missing {
        tracing::warn!(
            tool = tool.name,
            install = tool.install_hint,
            "required tool is missing"
        );
    }
    Err(VerifyError::ToolsMissing(missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProbe;
    use crate::tools::REQUIRED_TOOLS;

    const FIND_WALLY: RequiredTool = RequiredTool {
        name: "find-wally",
        install_hint: "https://you.can/find/install/instructions/#here",
    };
    const KILL_WALLY: RequiredTool = RequiredTool {
        name: "kill-wally",
        install_hint: "https://we.dont/have/install/instructions/#forthat",
    };

    #[tokio::test]
    async fn all_present_resolves_with_confirmation() {
        let probe = FakeProbe::with(["find-wally", "kill-wally"]);
        let msg = verify_tools(&probe, &[FIND_WALLY, KILL_WALLY]).await.unwrap();
        assert_eq!(msg, ALL_TOOLS_ACCESSIBLE);
    }

    #[tokio::test]
    async fn every_missing_tool_is_reported() {
        let probe = FakeProbe::with(Vec::<&str>::new());
        let err = verify_tools(&probe, &[FIND_WALLY, KILL_WALLY])
            .await
            .unwrap_err();
        assert_eq!(err.missing(), [FIND_WALLY, KILL_WALLY]);
        assert_eq!(
            err.to_string(),
            "missing required tools: find-wally, kill-wally"
        );
    }

    #[tokio::test]
    async fn one_missing_tool_does_not_hide_behind_a_present_one() {
        let probe = FakeProbe::with(["kubectl", "kind"]);
        let err = verify_tools(&probe, REQUIRED_TOOLS).await.unwrap_err();
        let names: Vec<_> = err.missing().iter().map(|t| t.name).collect();
        assert_eq!(names, ["clusteradm"]);
    }

    #[tokio::test]
    async fn every_tool_is_probed_even_after_a_miss() {
        let probe = FakeProbe::with(["kill-wally"]);
        let _ = verify_tools(&probe, &[FIND_WALLY, KILL_WALLY]).await;
        assert_eq!(probe.probed(), ["find-wally", "kill-wally"]);
    }

    #[tokio::test]
    async fn empty_tool_list_passes() {
        let probe = FakeProbe::with(Vec::<&str>::new());
        assert!(verify_tools(&probe, &[]).await.is_ok());
    }
}
