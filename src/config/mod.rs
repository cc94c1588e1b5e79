#[cfg(feature = "cli")]
pub mod cli;
pub mod prompt;
pub mod template_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use template_config::TemplateConfig;
