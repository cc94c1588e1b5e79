use crate::domain::model::{ProjectRequest, ScaffoldOutcome, Stage};
use crate::domain::ports::Pipeline;
use crate::utils::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};

/// Removes the downloaded archive when the run ends, whatever the outcome.
struct ArchiveGuard {
    path: PathBuf,
}

impl ArchiveGuard {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for ArchiveGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed archive {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Could not remove archive {}: {}", self.path.display(), e),
        }
    }
}

pub struct ScaffoldEngine<P: Pipeline> {
    pipeline: P,
    cleanup_on_failure: bool,
}

impl<P: Pipeline> ScaffoldEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            cleanup_on_failure: false,
        }
    }

    pub fn with_cleanup_on_failure(mut self, enabled: bool) -> Self {
        self.cleanup_on_failure = enabled;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs every stage in order and stops at the first failure, which is
    /// returned as `ScaffoldError::StageFailed`.
    pub async fn run(&self, request: &ProjectRequest) -> Result<ScaffoldOutcome> {
        let existed_before = request.project_dir.exists();
        let _archive = ArchiveGuard::new(self.pipeline.archive_path());

        let result = self.run_stages(request).await;

        if let Err(e) = &result {
            let reached_install = !matches!(
                e,
                ScaffoldError::StageFailed {
                    stage: Stage::Fetch,
                    ..
                }
            );
            if self.cleanup_on_failure && reached_install && !existed_before {
                self.remove_partial_project(&request.project_dir);
            }
        }

        result
    }

    async fn run_stages(&self, request: &ProjectRequest) -> Result<ScaffoldOutcome> {
        tracing::info!("Setting up {}...", request.project_name);

        // 下載模板
        let archive_bytes = self
            .pipeline
            .fetch()
            .await
            .map_err(|e| ScaffoldError::stage(Stage::Fetch, e))?;
        tracing::debug!("Downloaded {} bytes", archive_bytes);

        // 解壓縮
        let install = self
            .pipeline
            .install(request)
            .await
            .map_err(|e| ScaffoldError::stage(Stage::Install, e))?;
        tracing::debug!(
            "Extracted {} files and {} directories into {}",
            install.files_written,
            install.directories_created,
            request.project_dir.display()
        );

        tracing::info!("Replacing module names...");
        let rewrite = self
            .pipeline
            .rewrite(request)
            .await
            .map_err(|e| ScaffoldError::stage(Stage::Rewrite, e))?;
        tracing::debug!(
            "Made {} replacements across {} of {} files",
            rewrite.replacements,
            rewrite.files_changed,
            rewrite.files_visited
        );

        tracing::info!("Initializing Git repository...");
        self.pipeline
            .init_repository(request)
            .await
            .map_err(|e| ScaffoldError::stage(Stage::InitRepository, e))?;

        tracing::info!("Resolving dependencies...");
        self.pipeline
            .resolve_dependencies(request)
            .await
            .map_err(|e| ScaffoldError::stage(Stage::ResolveDependencies, e))?;

        Ok(ScaffoldOutcome {
            project_dir: request.project_dir.clone(),
            archive_bytes,
            install,
            rewrite,
        })
    }

    fn remove_partial_project(&self, project_dir: &Path) {
        match std::fs::remove_dir_all(project_dir) {
            Ok(()) => tracing::info!(
                "Removed partially created project {}",
                project_dir.display()
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Could not remove partially created project {}: {}",
                project_dir.display(),
                e
            ),
        }
    }
}
