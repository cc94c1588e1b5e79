pub mod engine;
pub mod fetcher;
pub mod installer;
pub mod pipeline;
pub mod rewriter;
pub mod tools;

pub use crate::domain::model::{InstallReport, ProjectRequest, RewriteReport, ScaffoldOutcome};
pub use crate::domain::ports::{Pipeline, ToolRunner};
pub use crate::utils::error::Result;
