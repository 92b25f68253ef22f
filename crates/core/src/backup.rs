use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::document::{DocumentError, ProjectDocument};

/// 備份流程可能發生的錯誤。 / Errors raised by the backup routine.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("document must be saved before it can be backed up")]
    DocumentNotSaved,
    #[error("failed to list the backup directory: {0}")]
    ListDir(#[source] io::Error),
    #[error("failed to save the backup copy: {0}")]
    Save(#[source] DocumentError),
}

/// Result of a successful backup.
#[derive(Debug, Clone)]
pub struct BackupOutcome {
    pub file_name: String,
    pub path: PathBuf,
    pub version: u32,
}

/// 依既有檔名計算下一個備份版本號。 / Computes the next unused backup version for `base_name` + `suffix`.
///
/// Extensions are stripped from the existing names and each stem is matched
/// against `^base_name suffix (digits)`; the next version is one past the
/// highest capture, or 1 when nothing matches. Names that do not match are
/// ignored, not errors.
pub fn next_version<I, S>(base_name: &str, suffix: &str, existing: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = format!(
        "^{}{}(\\d+)",
        regex::escape(base_name),
        regex::escape(suffix)
    );
    let matcher = Regex::new(&pattern).expect("escaped literals always form a valid pattern");

    let mut highest = 0;
    for name in existing {
        let name = name.as_ref();
        let stem = Path::new(name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(name);
        if let Some(captures) = matcher.captures(stem) {
            if let Ok(version) = captures[1].parse::<u32>() {
                highest = highest.max(version);
            }
        }
    }
    highest + 1
}

/// Renders `base_name + suffix + version`, reattaching the extension when
/// one is given.
pub fn backup_file_name(
    base_name: &str,
    suffix: &str,
    version: u32,
    extension: Option<&str>,
) -> String {
    match extension {
        Some(extension) => format!("{base_name}{suffix}{version}.{extension}"),
        None => format!("{base_name}{suffix}{version}"),
    }
}

/// 在文件所在資料夾建立一份遞增版本的備份複本。 / Saves a backup copy of `doc` with the next version suffix, in its own folder.
///
/// Save failures are surfaced, not retried.
pub fn create_backup(doc: &ProjectDocument, suffix: &str) -> Result<BackupOutcome, BackupError> {
    let path = doc.path().ok_or(BackupError::DocumentNotSaved)?;
    let dir = path.parent().ok_or(BackupError::DocumentNotSaved)?;
    let base_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or(BackupError::DocumentNotSaved)?;
    let extension = path.extension().and_then(|ext| ext.to_str());

    let mut existing = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(BackupError::ListDir)? {
        let entry = entry.map_err(BackupError::ListDir)?;
        existing.push(entry.file_name().to_string_lossy().into_owned());
    }

    let version = next_version(base_name, suffix, &existing);
    let file_name = backup_file_name(base_name, suffix, version, extension);
    let target = dir.join(&file_name);
    doc.save_copy_as(&target).map_err(BackupError::Save)?;

    Ok(BackupOutcome {
        file_name,
        path: target,
        version,
    })
}
