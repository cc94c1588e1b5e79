pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::TemplateConfig;
pub use crate::core::{engine::ScaffoldEngine, pipeline::TemplatePipeline, tools::SystemToolRunner};
pub use crate::domain::model::{ProjectRequest, RootPrefix, ScaffoldOutcome, Stage, ToolCommand};
pub use crate::utils::error::{Result, ScaffoldError};
