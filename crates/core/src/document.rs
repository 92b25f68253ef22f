use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::write_atomic;

/// Current project manifest format version.
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// 文件載入或儲存時可能發生的錯誤。 / Errors that can occur while loading or saving a project document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid project manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),
    #[error("document has never been saved")]
    NeverSaved,
}

/// 文件所引用的外部函式庫。 / An external library referenced by the document.
///
/// `filepath` is either absolute or document-relative (leading `//`); the
/// core only reads and temporarily rewrites it, never resolves its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedLibrary {
    pub name: String,
    pub filepath: String,
}

impl LinkedLibrary {
    pub fn new(name: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filepath: filepath.into(),
        }
    }
}

/// On-disk shape of a project file. Unknown fields are ignored so older
/// tools can open newer files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectManifest {
    #[serde(default = "default_format_version")]
    format_version: u32,
    #[serde(default)]
    libraries: Vec<LinkedLibrary>,
}

fn default_format_version() -> u32 {
    DOCUMENT_FORMAT_VERSION
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            format_version: DOCUMENT_FORMAT_VERSION,
            libraries: Vec::new(),
        }
    }
}

/// 代表一份載入記憶體的專案文件與其連結表。 / In-memory model of a project file and its linked-library table.
///
/// The library table is live session state: promotion temporarily rewrites
/// the entries and restores them before returning, without marking the
/// document dirty.
#[derive(Debug, Clone, Default)]
pub struct ProjectDocument {
    path: Option<PathBuf>,
    manifest: ProjectManifest,
    dirty: bool,
}

impl ProjectDocument {
    /// Creates an empty, never-saved document.
    pub fn new() -> Self {
        Self::default()
    }

    /// 從磁碟開啟專案文件；相對路徑會以目前工作目錄補齊。 / Opens a project file; relative paths are anchored at the current working directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()?.join(path)
        };
        let contents = fs::read_to_string(&absolute)?;
        let manifest: ProjectManifest = serde_json::from_str(&contents)?;
        Ok(Self {
            path: Some(absolute),
            manifest,
            dirty: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory containing the document, when it has been saved.
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }

    pub fn is_saved(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn libraries(&self) -> &[LinkedLibrary] {
        &self.manifest.libraries
    }

    /// 取得可變的連結表；晉升流程藉此暫時改寫路徑。 / Mutable view of the link table, used by promotion to rewrite paths in place.
    pub fn libraries_mut(&mut self) -> &mut [LinkedLibrary] {
        &mut self.manifest.libraries
    }

    /// Appends a library reference and marks the document dirty.
    pub fn add_library(&mut self, library: LinkedLibrary) {
        self.manifest.libraries.push(library);
        self.dirty = true;
    }

    /// 將文件寫回其原始路徑。 / Saves the document back to its own path.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NeverSaved)?;
        self.write_manifest(&path)?;
        self.dirty = false;
        Ok(())
    }

    /// 將目前狀態另存一份複本；不改變文件自身的路徑或 dirty 旗標。 / Saves a copy of the current state to `target`.
    ///
    /// This is a copy, not a move: the document's own path and dirty flag
    /// are left untouched, and whatever link paths are currently set (for
    /// example temporarily relocated ones) are what lands in the copy.
    pub fn save_copy_as(&self, target: &Path) -> Result<(), DocumentError> {
        self.write_manifest(target)
    }

    fn write_manifest(&self, target: &Path) -> Result<(), DocumentError> {
        let payload = serde_json::to_vec_pretty(&self.manifest)?;
        write_atomic(target, &payload)?;
        Ok(())
    }
}
