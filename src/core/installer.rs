use crate::domain::model::{InstallReport, RootPrefix};
use crate::utils::error::{Result, ScaffoldError};
use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Extracts `archive_path` under `project_dir`, stripping `prefix` from every
/// entry. Entries are handled in the archive's own order and the first
/// failure aborts, leaving whatever was already written.
pub fn install_archive(
    archive_path: &Path,
    project_dir: &Path,
    prefix: &RootPrefix,
) -> Result<InstallReport> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    extract_entries(&mut archive, project_dir, prefix)
}

pub fn extract_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    project_dir: &Path,
    prefix: &RootPrefix,
) -> Result<InstallReport> {
    let stripped = resolve_prefix(archive, prefix)?;
    tracing::debug!(
        "Extracting {} entries into {} (root prefix: {:?})",
        archive.len(),
        project_dir.display(),
        stripped
    );

    let mut report = InstallReport {
        stripped_prefix: stripped.clone(),
        ..InstallReport::default()
    };

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let enclosed = entry
            .enclosed_name()
            .ok_or_else(|| ScaffoldError::UnsafeArchiveEntry { entry: name.clone() })?;
        let relative = strip_root(&enclosed, stripped.as_deref(), &name)?;
        let dest = project_dir.join(relative);
        let mode = entry.unix_mode();

        if entry.is_dir() {
            create_dir(&dest, mode)?;
            report.directories_created += 1;
        } else {
            // 目錄項目不一定排在檔案之前
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = create_file(&dest, mode)?;
            io::copy(&mut entry, &mut out)?;
            report.files_written += 1;
        }
    }

    Ok(report)
}

fn resolve_prefix<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &RootPrefix,
) -> Result<Option<String>> {
    match prefix {
        RootPrefix::Literal(p) => Ok(Some(p.clone())),
        RootPrefix::None => Ok(None),
        RootPrefix::Detect => {
            let mut entries = Vec::with_capacity(archive.len());
            for i in 0..archive.len() {
                let entry = archive.by_index(i)?;
                let path = entry.enclosed_name().ok_or_else(|| {
                    ScaffoldError::UnsafeArchiveEntry {
                        entry: entry.name().to_string(),
                    }
                })?;
                entries.push((path, entry.is_dir()));
            }
            Ok(detect_root(&entries))
        }
    }
}

/// Returns the top-level directory shared by every entry, or `None` when the
/// archive has more than one top-level item or a bare top-level file.
pub fn detect_root(entries: &[(PathBuf, bool)]) -> Option<String> {
    let mut root: Option<&std::ffi::OsStr> = None;
    for (path, is_dir) in entries {
        let mut components = path.components();
        let first = match components.next() {
            Some(Component::Normal(first)) => first,
            _ => return None,
        };
        if components.next().is_none() && !is_dir {
            return None;
        }
        match root {
            Some(existing) if existing != first => return None,
            Some(_) => {}
            None => root = Some(first),
        }
    }
    root.map(|r| r.to_string_lossy().into_owned())
}

fn strip_root<'a>(path: &'a Path, prefix: Option<&str>, name: &str) -> Result<&'a Path> {
    match prefix {
        None => Ok(path),
        Some(prefix) => path
            .strip_prefix(prefix)
            .map_err(|_| ScaffoldError::RootPrefixMismatch {
                entry: name.to_string(),
                prefix: prefix.to_string(),
            }),
    }
}

fn create_dir(path: &Path, mode: Option<u32>) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        if let Some(mode) = mode {
            builder.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

fn create_file(path: &Path, mode: Option<u32>) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode & 0o7777);
        }
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}
