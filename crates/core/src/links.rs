use std::path::Path;

use crate::document::LinkedLibrary;
use crate::paths::{link_basename, make_relative};

/// 記錄改寫前的連結路徑，供還原使用。 / Original link paths recorded by [`relocate`], consumed once by [`restore`].
///
/// Every entry recorded at relocate time must be written back before the
/// surrounding workflow returns, on success and on failure alike.
#[derive(Debug, Default)]
pub struct LinkRestoreMap {
    entries: Vec<(usize, String)>,
}

impl LinkRestoreMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 回報 production 資料夾中缺少哪些連結檔案。 / Reports which linked files are missing from the production folder.
///
/// For each link, the basename of its current path must exist as a regular
/// file under `production_path`. Returns the names of the missing ones in
/// input order; an empty result means the link set is consistent.
pub fn find_broken_links(production_path: &Path, links: &[LinkedLibrary]) -> Vec<String> {
    let mut broken = Vec::new();
    for link in links {
        let present = link_basename(&link.filepath)
            .map(|name| production_path.join(name).is_file())
            .unwrap_or(false);
        if !present {
            broken.push(link.name.clone());
        }
    }
    broken
}

/// 將所有連結暫時指向 production 資料夾，並記下原始路徑。 / Repoints every link at its production counterpart, recording originals.
///
/// The rewritten path is `production_path/basename`, rendered relative to
/// the production folder itself — that is where the promoted copy lives, so
/// the copy's links resolve in place. This mutates live session state; the
/// returned map is the caller's obligation to [`restore`].
pub fn relocate(production_path: &Path, links: &mut [LinkedLibrary]) -> LinkRestoreMap {
    let mut entries = Vec::with_capacity(links.len());
    for (index, link) in links.iter_mut().enumerate() {
        let Some(name) = link_basename(&link.filepath).map(str::to_owned) else {
            continue;
        };
        let target = production_path.join(name);
        let relocated = make_relative(production_path, &target);
        entries.push((index, std::mem::replace(&mut link.filepath, relocated)));
    }
    LinkRestoreMap { entries }
}

/// 依還原表將連結路徑寫回原值。 / Writes every recorded original path back into the link table.
pub fn restore(links: &mut [LinkedLibrary], map: LinkRestoreMap) {
    for (index, original) in map.entries {
        if let Some(link) = links.get_mut(index) {
            link.filepath = original;
        }
    }
}
