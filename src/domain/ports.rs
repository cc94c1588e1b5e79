use crate::domain::model::{InstallReport, ProjectRequest, RewriteReport, ToolCommand};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Runs external programs. Swapped for a recorder in tests.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand, working_dir: Option<&Path>) -> Result<()>;
}

/// The five scaffolding stages, driven in order by `ScaffoldEngine`.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Where `fetch` stores the template archive.
    fn archive_path(&self) -> &Path;
    async fn fetch(&self) -> Result<u64>;
    async fn install(&self, request: &ProjectRequest) -> Result<InstallReport>;
    async fn rewrite(&self, request: &ProjectRequest) -> Result<RewriteReport>;
    async fn init_repository(&self, request: &ProjectRequest) -> Result<()>;
    async fn resolve_dependencies(&self, request: &ProjectRequest) -> Result<()>;
}
