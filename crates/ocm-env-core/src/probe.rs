use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;

/// Checks whether an executable can be resolved on the search path.
pub trait ToolProbe {
    fn exists(&self, tool: &str) -> impl Future<Output = bool> + Send;
}

/// [`ToolProbe`] backed by `which`. Searches `PATH` unless an explicit
/// search path is given.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    search_path: Option<OsString>,
}

impl PathProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn locate(tool: &str, search_path: Option<&OsString>) -> Option<PathBuf> {
        match search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(tool, Some(paths), cwd).ok()
            }
            None => which::which(tool).ok(),
        }
    }
}

impl ToolProbe for PathProbe {
    async fn exists(&self, tool: &str) -> bool {
        let tool = tool.to_string();
        let search_path = self.search_path.clone();
        let located = tokio::task::spawn_blocking(move || {
            let found = Self::locate(&tool, search_path.as_ref());
            (tool, found)
        })
        .await;

        match located {
            Ok((tool, Some(path))) => {
                tracing::debug!(tool = %tool, path = %path.display(), "tool found");
                true
            }
            Ok((tool, None)) => {
                tracing::debug!(tool = %tool, "tool not found");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "tool probe task failed");
                false
            }
        }
    }
}
