use std::path::{Path, PathBuf};

/// 由起點往上逐層探測的有界搜尋。 / Bounded upward search from `start` through its ancestors.
///
/// The starting directory is always probed, regardless of `max_depth`; the
/// budget only bounds additional ancestor hops and is decremented once per
/// hop. Running out of budget or out of ancestors yields `None` — a normal
/// negative result, not an error.
pub fn search_upward<T, F>(start: &Path, max_depth: i32, mut probe: F) -> Option<T>
where
    F: FnMut(&Path) -> Option<T>,
{
    let mut current = start;
    let mut remaining = max_depth;
    loop {
        remaining -= 1;
        if let Some(found) = probe(current) {
            return Some(found);
        }
        if remaining <= 0 {
            return None;
        }
        current = current.parent()?;
    }
}

/// 檢查路徑本身或其祖先是否為指定名稱的編輯資料夾。 / Returns `true` when `start` or one of its in-budget ancestors is named `edit_folder_name`.
pub fn is_under_edit_folder(edit_folder_name: &str, start: &Path, max_depth: i32) -> bool {
    search_upward(start, max_depth, |dir| {
        (dir.file_name().and_then(|name| name.to_str()) == Some(edit_folder_name)).then_some(())
    })
    .is_some()
}

/// 從起點往上尋找最近的 production 子資料夾。 / Finds the nearest subdirectory named `production_folder_name`, walking upward from `start`.
pub fn find_production_folder(
    production_folder_name: &str,
    start: &Path,
    max_depth: i32,
) -> Option<PathBuf> {
    search_upward(start, max_depth, |dir| {
        let candidate = dir.join(production_folder_name);
        candidate.is_dir().then_some(candidate)
    })
}
