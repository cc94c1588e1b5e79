use crate::domain::model::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Archive entry '{entry}' escapes the destination directory")]
    UnsafeArchiveEntry { entry: String },

    #[error("Archive entry '{entry}' does not start with root prefix '{prefix}'")]
    RootPrefixMismatch { entry: String, prefix: String },

    #[error("Tool '{program}' was not found on PATH")]
    ToolNotFound { program: String },

    #[error("'{command}' failed: {status}")]
    ToolFailed { command: String, status: String },

    #[error("Error {stage}: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<ScaffoldError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Archive,
    Process,
    Configuration,
}

impl ScaffoldError {
    pub fn stage(stage: Stage, source: ScaffoldError) -> Self {
        ScaffoldError::StageFailed {
            stage,
            source: Box::new(source),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScaffoldError::IoError(_) | ScaffoldError::WalkError(_) => ErrorCategory::Io,
            ScaffoldError::HttpError(_) => ErrorCategory::Network,
            ScaffoldError::ZipError(_)
            | ScaffoldError::UnsafeArchiveEntry { .. }
            | ScaffoldError::RootPrefixMismatch { .. } => ErrorCategory::Archive,
            ScaffoldError::ToolNotFound { .. } | ScaffoldError::ToolFailed { .. } => {
                ErrorCategory::Process
            }
            ScaffoldError::ConfigError { .. }
            | ScaffoldError::MissingConfigError { .. }
            | ScaffoldError::ConfigValidationError { .. }
            | ScaffoldError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScaffoldError::StageFailed { source, .. } => source.category(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScaffoldError::HttpError(_) => {
                "Check your network connection and the template URL".to_string()
            }
            ScaffoldError::ZipError(_) => {
                "The downloaded file is not a valid zip archive; verify the template URL points at a zip snapshot".to_string()
            }
            ScaffoldError::RootPrefixMismatch { .. } => {
                "Set `root_prefix = \"auto\"` in the profile or pass --root-prefix matching the archive's top-level folder".to_string()
            }
            ScaffoldError::UnsafeArchiveEntry { .. } => {
                "The archive is malformed or hostile; do not use it".to_string()
            }
            ScaffoldError::ToolNotFound { program } => {
                format!("Install '{}' and make sure it is on PATH", program)
            }
            ScaffoldError::ToolFailed { .. } => {
                "Inspect the tool output above and rerun the command inside the project directory".to_string()
            }
            ScaffoldError::IoError(_) | ScaffoldError::WalkError(_) => {
                "Check file permissions and available disk space".to_string()
            }
            ScaffoldError::ConfigError { .. }
            | ScaffoldError::MissingConfigError { .. }
            | ScaffoldError::ConfigValidationError { .. }
            | ScaffoldError::InvalidConfigValueError { .. } => {
                "Fix the command-line flags or profile file and run again".to_string()
            }
            ScaffoldError::StageFailed { source, .. } => source.recovery_suggestion(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
