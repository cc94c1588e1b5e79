use std::fmt;
use std::path::{Path, PathBuf};

/// What the user asked for: a project directory and the module identifier
/// that replaces the template's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    pub project_name: String,
    pub module_name: String,
    pub project_dir: PathBuf,
}

impl ProjectRequest {
    pub fn new(
        project_name: impl Into<String>,
        module_name: impl Into<String>,
        output_dir: impl AsRef<Path>,
    ) -> Self {
        let project_name = project_name.into();
        let project_dir = output_dir.as_ref().join(&project_name);
        Self {
            project_name,
            module_name: module_name.into(),
            project_dir,
        }
    }
}

/// How archive entry paths are re-rooted under the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootPrefix {
    /// Strip exactly this leading component; entries without it are rejected.
    Literal(String),
    /// Strip the single top-level directory shared by every entry, if any.
    Detect,
    None,
}

impl RootPrefix {
    pub const DETECT_KEYWORD: &'static str = "auto";

    pub fn parse(value: &str) -> Self {
        let value = value.trim().trim_end_matches('/');
        if value.is_empty() {
            RootPrefix::None
        } else if value.eq_ignore_ascii_case(Self::DETECT_KEYWORD) {
            RootPrefix::Detect
        } else {
            RootPrefix::Literal(value.to_string())
        }
    }
}

impl fmt::Display for RootPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootPrefix::Literal(prefix) => write!(f, "{}", prefix),
            RootPrefix::Detect => write!(f, "{}", Self::DETECT_KEYWORD),
            RootPrefix::None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub directories_created: usize,
    pub files_written: usize,
    pub stripped_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub files_visited: usize,
    pub files_changed: usize,
    pub replacements: usize,
}

/// An external program plus the fixed leading arguments it is always run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a command from an argv-style list; `None` when the list is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Install,
    Rewrite,
    InitRepository,
    ResolveDependencies,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Fetch => "downloading template repository",
            Stage::Install => "extracting template repository",
            Stage::Rewrite => "replacing module names",
            Stage::InitRepository => "initializing Git repository",
            Stage::ResolveDependencies => "resolving dependencies",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub project_dir: PathBuf,
    pub archive_bytes: u64,
    pub install: InstallReport,
    pub rewrite: RewriteReport,
}
