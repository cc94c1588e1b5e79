use crate::domain::model::{RootPrefix, ToolCommand};
use crate::utils::error::{Result, ScaffoldError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE_URL: &str = "https://github.com/ralphvw/go-template/archive/main.zip";
pub const DEFAULT_ROOT_PREFIX: &str = "go-template-main";
pub const DEFAULT_MODULE_TOKEN: &str = "github.com/ralphvw/go-template";
pub const DEFAULT_ARCHIVE_PATH: &str = "template.zip";

/// Template profile. Every section is optional in the TOML file; missing
/// values fall back to the go-template defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub template: TemplateSection,
    pub download: DownloadSection,
    pub tools: ToolsSection,
    pub project: ProjectSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSection {
    pub url: String,
    /// Literal folder name, `"auto"` to detect it, or `""` to keep paths as-is.
    pub root_prefix: String,
    pub module_token: String,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_TEMPLATE_URL.to_string(),
            root_prefix: DEFAULT_ROOT_PREFIX.to_string(),
            module_token: DEFAULT_MODULE_TOKEN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSection {
    pub archive_path: PathBuf,
    pub timeout_seconds: Option<u64>,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub vcs_init: Vec<String>,
    pub dependency_resolve: Vec<String>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            vcs_init: vec!["git".to_string(), "init".to_string()],
            dependency_resolve: vec!["go".to_string(), "mod".to_string(), "tidy".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    pub output_dir: PathBuf,
    pub cleanup_on_failure: bool,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cleanup_on_failure: false,
        }
    }
}

impl TemplateConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScaffoldError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScaffoldError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TEMPLATE_URL})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScaffoldError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn root_prefix(&self) -> RootPrefix {
        RootPrefix::parse(&self.template.root_prefix)
    }

    pub fn vcs_init_command(&self) -> Result<ToolCommand> {
        validation::validate_command("tools.vcs_init", &self.tools.vcs_init)?;
        ToolCommand::from_argv(&self.tools.vcs_init).ok_or_else(|| ScaffoldError::MissingConfigError {
            field: "tools.vcs_init".to_string(),
        })
    }

    pub fn dependency_command(&self) -> Result<ToolCommand> {
        validation::validate_command("tools.dependency_resolve", &self.tools.dependency_resolve)?;
        ToolCommand::from_argv(&self.tools.dependency_resolve).ok_or_else(|| {
            ScaffoldError::MissingConfigError {
                field: "tools.dependency_resolve".to_string(),
            }
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("template.url", &self.template.url)?;
        validation::validate_non_empty_string("template.module_token", &self.template.module_token)?;
        validation::validate_path(
            "download.archive_path",
            &self.download.archive_path.to_string_lossy(),
        )?;
        validation::validate_path(
            "project.output_dir",
            &self.project.output_dir.to_string_lossy(),
        )?;
        validation::validate_command("tools.vcs_init", &self.tools.vcs_init)?;
        validation::validate_command("tools.dependency_resolve", &self.tools.dependency_resolve)?;

        if self.download.timeout_seconds == Some(0) {
            return Err(ScaffoldError::InvalidConfigValueError {
                field: "download.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for TemplateConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
