use crate::config::template_config::TemplateConfig;
use crate::core::{fetcher, installer, rewriter, tools};
use crate::domain::model::{InstallReport, ProjectRequest, RewriteReport, RootPrefix, ToolCommand};
use crate::domain::ports::{Pipeline, ToolRunner};
use crate::utils::error::Result;
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Scaffolds a project from a remote zip template described by a
/// `TemplateConfig`.
pub struct TemplatePipeline<R: ToolRunner> {
    template_url: String,
    root_prefix: RootPrefix,
    module_token: String,
    archive_path: PathBuf,
    vcs_init: ToolCommand,
    dependency_resolve: ToolCommand,
    client: Client,
    runner: R,
}

impl<R: ToolRunner> TemplatePipeline<R> {
    pub fn new(config: &TemplateConfig, runner: R) -> Result<Self> {
        Ok(Self {
            template_url: config.template.url.clone(),
            root_prefix: config.root_prefix(),
            module_token: config.template.module_token.clone(),
            archive_path: config.download.archive_path.clone(),
            vcs_init: config.vcs_init_command()?,
            dependency_resolve: config.dependency_command()?,
            client: fetcher::build_client(config.download.timeout_seconds)?,
            runner,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

#[async_trait::async_trait]
impl<R: ToolRunner> Pipeline for TemplatePipeline<R> {
    fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    async fn fetch(&self) -> Result<u64> {
        fetcher::download_file(&self.client, &self.template_url, &self.archive_path).await
    }

    async fn install(&self, request: &ProjectRequest) -> Result<InstallReport> {
        installer::install_archive(&self.archive_path, &request.project_dir, &self.root_prefix)
    }

    async fn rewrite(&self, request: &ProjectRequest) -> Result<RewriteReport> {
        rewriter::replace_module_token(
            &request.project_dir,
            &self.module_token,
            &request.module_name,
        )
    }

    async fn init_repository(&self, request: &ProjectRequest) -> Result<()> {
        tools::init_repository(&self.runner, &self.vcs_init, &request.project_dir).await
    }

    async fn resolve_dependencies(&self, request: &ProjectRequest) -> Result<()> {
        tools::resolve_dependencies(&self.runner, &self.dependency_resolve, &request.project_dir)
            .await
    }
}
