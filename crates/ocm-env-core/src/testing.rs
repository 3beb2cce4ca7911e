//! Scripted shell and probe doubles shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::ShellError;
use crate::probe::ToolProbe;
use crate::shell::ShellRunner;

enum Reply {
    Stdout(String),
    Fail(String),
}

/// Answers commands by prefix (first matching rule wins, unmatched commands
/// succeed with empty output) and records every command line it receives.
#[derive(Default)]
pub(crate) struct FakeShell {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl FakeShell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, prefix: &str, stdout: &str) -> Self {
        self.rules
            .push((prefix.to_string(), Reply::Stdout(stdout.to_string())));
        self
    }

    pub(crate) fn fail(mut self, prefix: &str, stderr: &str) -> Self {
        self.rules
            .push((prefix.to_string(), Reply::Fail(stderr.to_string())));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl ShellRunner for FakeShell {
    async fn run(&self, command: &str) -> Result<String, ShellError> {
        self.calls.lock().unwrap().push(command.to_string());
        tokio::task::yield_now().await;

        match self.rules.iter().find(|(p, _)| command.starts_with(p.as_str())) {
            Some((_, Reply::Stdout(out))) => Ok(out.clone()),
            Some((_, Reply::Fail(stderr))) => Err(ShellError::Failed {
                command: command.to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

/// Reports the listed tools as installed and records every probe.
pub(crate) struct FakeProbe {
    installed: HashSet<String>,
    probed: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub(crate) fn with<I, S>(installed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: installed.into_iter().map(Into::into).collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

impl ToolProbe for FakeProbe {
    async fn exists(&self, tool: &str) -> bool {
        self.probed.lock().unwrap().push(tool.to_string());
        tokio::task::yield_now().await;
        self.installed.contains(tool)
    }
}
