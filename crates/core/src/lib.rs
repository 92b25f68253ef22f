pub mod backup;
pub mod document;
pub mod links;
pub mod locate;
pub mod paths;
pub mod promote;

pub use backup::{backup_file_name, create_backup, next_version, BackupError, BackupOutcome};
pub use document::{DocumentError, LinkedLibrary, ProjectDocument, DOCUMENT_FORMAT_VERSION};
pub use links::{find_broken_links, relocate, restore, LinkRestoreMap};
pub use locate::{find_production_folder, is_under_edit_folder, search_upward};
pub use promote::{promote, PromoteError, PromotionConfig, PromotionOutcome};
