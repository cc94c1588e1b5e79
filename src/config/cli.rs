use super::prompt;
use super::template_config::TemplateConfig;
use crate::domain::model::ProjectRequest;
use crate::utils::error::Result;
use crate::utils::validation;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "go-scaffold")]
#[command(about = "Scaffold a new Go project from a remote template archive")]
pub struct CliConfig {
    /// Name of the directory to create; prompted for when omitted
    #[arg(long)]
    pub project_name: Option<String>,

    /// Module path replacing the template's; prompted for when omitted
    #[arg(long)]
    pub module_name: Option<String>,

    /// Path to a TOML template profile
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub template_url: Option<String>,

    /// Archive root folder to strip, "auto" to detect, "" to keep paths
    #[arg(long)]
    pub root_prefix: Option<String>,

    /// Module path used inside the template
    #[arg(long)]
    pub module_token: Option<String>,

    #[arg(long)]
    pub archive_path: Option<PathBuf>,

    /// Directory the project is created in
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Remove the project directory if a later step fails
    #[arg(long)]
    pub cleanup_on_failure: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the profile (or the defaults) and applies command-line overrides.
    pub fn load_template_config(&self) -> Result<TemplateConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading template profile from: {}", path.display());
                TemplateConfig::from_file(path)?
            }
            None => TemplateConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TemplateConfig) {
        if let Some(url) = &self.template_url {
            config.template.url = url.clone();
        }
        if let Some(prefix) = &self.root_prefix {
            config.template.root_prefix = prefix.clone();
        }
        if let Some(token) = &self.module_token {
            config.template.module_token = token.clone();
        }
        if let Some(path) = &self.archive_path {
            config.download.archive_path = path.clone();
        }
        if let Some(secs) = self.timeout_seconds {
            config.download.timeout_seconds = Some(secs);
        }
        if let Some(dir) = &self.output_dir {
            config.project.output_dir = dir.clone();
        }
        if self.cleanup_on_failure {
            config.project.cleanup_on_failure = true;
        }
    }

    /// Collects project and module names from flags or prompts and validates them.
    pub fn resolve_request<R: BufRead, W: Write>(
        &self,
        config: &TemplateConfig,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<ProjectRequest> {
        let project_name = prompt::value_or_prompt(
            self.project_name.as_deref(),
            reader,
            writer,
            prompt::PROJECT_NAME_PROMPT,
        )?;
        validation::validate_project_name("project_name", &project_name)?;

        let module_name = prompt::value_or_prompt(
            self.module_name.as_deref(),
            reader,
            writer,
            prompt::MODULE_NAME_PROMPT,
        )?;
        validation::validate_non_empty_string("module_name", &module_name)?;

        Ok(ProjectRequest::new(
            project_name,
            module_name,
            &config.project.output_dir,
        ))
    }
}
