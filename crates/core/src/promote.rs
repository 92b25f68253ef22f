use std::path::PathBuf;

use thiserror::Error;

use crate::document::{DocumentError, ProjectDocument};
use crate::links::{find_broken_links, relocate, restore};
use crate::locate::{find_production_folder, is_under_edit_folder};

/// 晉升流程使用的搜尋設定。 / Directory-search configuration for the promotion workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionConfig {
    pub production_folder_name: String,
    pub edit_folder_name: String,
    pub search_depth: i32,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            production_folder_name: "assets".to_string(),
            edit_folder_name: "edit".to_string(),
            search_depth: 3,
        }
    }
}

/// 晉升流程的終止錯誤；每一種都代表使用者需先修正的前置條件。 / Terminal promotion failures; each names a precondition the user must fix before retrying.
#[derive(Debug, Error)]
pub enum PromoteError {
    #[error("document must be saved before it can be promoted")]
    DocumentNotSaved,
    #[error("file needs to be in an `{0}` folder")]
    NotInEditFolder(String),
    #[error("no production folder named `{0}` was found")]
    NoProductionFolderFound(String),
    #[error("missing linked libraries in production folder: {}", .0.join(", "))]
    BrokenLinkedLibraries(Vec<String>),
    #[error("failed to save the promoted copy: {0}")]
    SaveFailed(#[source] DocumentError),
}

/// Result of a successful promotion.
#[derive(Debug, Clone)]
pub struct PromotionOutcome {
    /// The production folder the file was promoted into.
    pub production_dir: PathBuf,
    /// Full path of the promoted copy.
    pub promoted_path: PathBuf,
}

/// 將文件從編輯資料夾晉升到 production 資料夾。 / Promotes `doc` from its edit-stage folder into the production folder.
///
/// The document must sit under an edit folder; a production folder must be
/// found within the search depth; every linked library must already exist
/// there. Only then are the links temporarily repointed, the copy saved,
/// and the links restored. No session state is touched before the relocate
/// step, and once it has run the restore runs on every exit path — a failed
/// save still restores before reporting [`PromoteError::SaveFailed`].
pub fn promote(
    doc: &mut ProjectDocument,
    config: &PromotionConfig,
) -> Result<PromotionOutcome, PromoteError> {
    let path = doc
        .path()
        .map(PathBuf::from)
        .ok_or(PromoteError::DocumentNotSaved)?;
    let document_dir = path
        .parent()
        .map(PathBuf::from)
        .ok_or(PromoteError::DocumentNotSaved)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or(PromoteError::DocumentNotSaved)?;

    if !is_under_edit_folder(&config.edit_folder_name, &document_dir, config.search_depth) {
        return Err(PromoteError::NotInEditFolder(
            config.edit_folder_name.clone(),
        ));
    }

    let production_dir = find_production_folder(
        &config.production_folder_name,
        &document_dir,
        config.search_depth,
    )
    .ok_or_else(|| PromoteError::NoProductionFolderFound(config.production_folder_name.clone()))?;

    let broken = find_broken_links(&production_dir, doc.libraries());
    if !broken.is_empty() {
        return Err(PromoteError::BrokenLinkedLibraries(broken));
    }

    let promoted_path = production_dir.join(file_name);

    // First point of mutation. The restore below is unconditional.
    let restore_map = relocate(&production_dir, doc.libraries_mut());
    let saved = doc.save_copy_as(&promoted_path);
    restore(doc.libraries_mut(), restore_map);
    saved.map_err(PromoteError::SaveFailed)?;

    Ok(PromotionOutcome {
        production_dir,
        promoted_path,
    })
}
