use crate::domain::model::RewriteReport;
use crate::utils::error::{Result, ScaffoldError};
use regex::bytes::{NoExpand, Regex};
use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Literal byte-level token replacement. Files are treated as opaque bytes, so
/// binary content containing the token is rewritten too.
pub struct TokenReplacer {
    pattern: Regex,
    replacement: Vec<u8>,
}

impl TokenReplacer {
    pub fn new(token: &str, replacement: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(ScaffoldError::ConfigValidationError {
                field: "template.module_token".to_string(),
                message: "token to replace cannot be empty".to_string(),
            });
        }
        let pattern = Regex::new(&regex::escape(token)).map_err(|e| ScaffoldError::ConfigError {
            message: format!("cannot build matcher for token '{}': {}", token, e),
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.as_bytes().to_vec(),
        })
    }

    /// Returns the rewritten bytes and how many occurrences were replaced.
    pub fn replace<'a>(&self, data: &'a [u8]) -> (Cow<'a, [u8]>, usize) {
        let count = self.pattern.find_iter(data).count();
        if count == 0 {
            return (Cow::Borrowed(data), 0);
        }
        let replaced = self
            .pattern
            .replace_all(data, NoExpand(self.replacement.as_slice()));
        (replaced, count)
    }
}

/// Replaces `token` with `replacement` in every regular file under `root`.
/// The first read or write error stops the walk; files already rewritten stay
/// rewritten.
pub fn replace_module_token(root: &Path, token: &str, replacement: &str) -> Result<RewriteReport> {
    let replacer = TokenReplacer::new(token, replacement)?;
    let mut report = RewriteReport::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        report.files_visited += 1;

        let path = entry.path();
        let data = fs::read(path)?;
        let (rewritten, count) = replacer.replace(&data);
        if count == 0 {
            continue;
        }

        write_back(path, &rewritten)?;
        tracing::debug!("Replaced {} occurrence(s) in {}", count, path.display());
        report.files_changed += 1;
        report.replacements += count;
    }

    Ok(report)
}

fn write_back(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(data)
}
