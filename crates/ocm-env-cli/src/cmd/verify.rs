use crate::output::{print_json, print_table};
use ocm_env_core::{verify_tools, PathProbe, VerifyError, REQUIRED_TOOLS};

pub fn run(json: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(verify_tools(&PathProbe::new(), REQUIRED_TOOLS));

    if json {
        let missing = match &result {
            Ok(_) => &[][..],
            Err(err) => err.missing(),
        };
        print_json(&serde_json::json!({
            "ok": result.is_ok(),
            "missing": missing,
        }))?;
    }

    match result {
        Ok(msg) => {
            if !json {
                println!("{msg}");
            }
            Ok(())
        }
        Err(err) => Err(missing_tools(err, json)),
    }
}

/// Print install guidance for every missing tool and turn the failure into
/// the command's error.
pub(crate) fn missing_tools(err: VerifyError, json: bool) -> anyhow::Error {
    if !json {
        let rows = err
            .missing()
            .iter()
            .map(|t| vec![t.name.to_string(), t.install_hint.to_string()])
            .collect();
        print_table(&["MISSING", "INSTALL INSTRUCTIONS"], rows);
    }
    anyhow::Error::new(err).context("unable to verify the existence of the required tools")
}
