use crate::domain::model::ToolCommand;
use crate::domain::ports::ToolRunner;
use crate::utils::error::{Result, ScaffoldError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs tools as child processes with stdout/stderr inherited from this
/// process, so their output shows up directly in the terminal.
#[derive(Debug, Clone, Default)]
pub struct SystemToolRunner;

impl SystemToolRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for SystemToolRunner {
    async fn run(&self, command: &ToolCommand, working_dir: Option<&Path>) -> Result<()> {
        tracing::debug!("Running '{}' (cwd: {:?})", command, working_dir);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScaffoldError::ToolNotFound {
                program: command.program.clone(),
            },
            _ => ScaffoldError::IoError(e),
        })?;

        if !status.success() {
            return Err(ScaffoldError::ToolFailed {
                command: command.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

/// `<vcs init> <project_dir>`, run from the current directory.
pub async fn init_repository<T: ToolRunner + ?Sized>(
    runner: &T,
    vcs_init: &ToolCommand,
    project_dir: &Path,
) -> Result<()> {
    let command = vcs_init
        .clone()
        .with_arg(project_dir.to_string_lossy().into_owned());
    runner.run(&command, None).await
}

/// Runs the dependency tool with the project directory as its working
/// directory. The current process directory is left alone.
pub async fn resolve_dependencies<T: ToolRunner + ?Sized>(
    runner: &T,
    dependency_resolve: &ToolCommand,
    project_dir: &Path,
) -> Result<()> {
    runner.run(dependency_resolve, Some(project_dir)).await
}
