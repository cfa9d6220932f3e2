//! Build script execution with target environment injection.

use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::info;

/// The build tool name that a configured `gom` alias replaces.
const DEFAULT_BUILD_TOOL: &str = "go";

/// Capability for executing one shell-level build step.
///
/// The orchestrator only depends on this trait, so tests can swap in an
/// in-process runner instead of spawning a real shell.
pub trait CommandRunner {
    fn run(&self, command: &str, env: &[(String, String)]) -> Result<()>;
}

/// Runs each command under the host shell with inherited stdio, so build
/// output streams live instead of being buffered.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, env: &[(String, String)]) -> Result<()> {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        for (key, value) in env {
            cmd.env(key, value);
        }
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn `{command}`"))?;
        if !status.success() {
            bail!(
                "build step `{command}` failed (exit code {})",
                status.code().unwrap_or(-1)
            );
        }
        Ok(())
    }
}

/// Executes the configured script sequentially with `GOOS`/`GOARCH` set for
/// every step. The first failing step aborts the rest; steps are never
/// retried.
pub struct BuildRunner<'a> {
    runner: &'a dyn CommandRunner,
    env: Vec<(String, String)>,
    gom: Option<String>,
}

impl<'a> BuildRunner<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        goos: &str,
        goarch: &str,
        gom: Option<&str>,
    ) -> Self {
        Self {
            runner,
            env: vec![
                ("GOOS".to_string(), goos.to_string()),
                ("GOARCH".to_string(), goarch.to_string()),
            ],
            gom: gom.map(|s| s.to_string()),
        }
    }

    pub fn run_script(&self, script: &[String]) -> Result<()> {
        for command in script {
            let command = match &self.gom {
                Some(alias) => apply_tool_alias(command, alias),
                None => command.clone(),
            };
            info!("run: {command}");
            self.runner.run(&command, &self.env)?;
        }
        Ok(())
    }
}

/// Replace the leading build tool name with the configured alias, leaving
/// every other command untouched.
pub fn apply_tool_alias(command: &str, alias: &str) -> String {
    let trimmed = command.trim_start();
    match trimmed.split_whitespace().next() {
        Some(first) if first == DEFAULT_BUILD_TOOL => {
            let rest = trimmed[first.len()..].trim_start();
            if rest.is_empty() {
                alias.to_string()
            } else {
                format!("{alias} {rest}")
            }
        }
        _ => command.to_string(),
    }
}
