use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// 標記路徑相對於文件所在資料夾的前綴。 / Prefix marking a path as relative to the owning document's directory.
pub const RELATIVE_PREFIX: &str = "//";

/// Returns `true` when the link path uses the document-relative convention.
pub fn is_document_relative(link_path: &str) -> bool {
    link_path.starts_with(RELATIVE_PREFIX)
}

/// 將連結路徑解析為絕對路徑。 / Resolves a link path against the document's directory.
///
/// Absolute paths are passed through unchanged; `//`-prefixed paths are
/// joined onto `document_dir`, honouring `.` and `..` segments.
pub fn resolve(document_dir: &Path, link_path: &str) -> PathBuf {
    match link_path.strip_prefix(RELATIVE_PREFIX) {
        Some(rest) => {
            let mut resolved = document_dir.to_path_buf();
            for segment in rest.split(['/', '\\']) {
                match segment {
                    "" | "." => {}
                    ".." => {
                        resolved.pop();
                    }
                    other => resolved.push(other),
                }
            }
            resolved
        }
        None => PathBuf::from(link_path),
    }
}

/// 以 `//` 慣例將目標路徑改寫為相對於基準資料夾。 / Renders `target` relative to `base_dir` using the `//` convention.
///
/// When the two paths share no common ancestor (for example different
/// Windows drive prefixes) the absolute rendering is returned instead.
pub fn make_relative(base_dir: &Path, target: &Path) -> String {
    let base: Vec<Component> = base_dir.components().collect();
    let dest: Vec<Component> = target.components().collect();

    let mut shared = 0;
    while shared < base.len() && shared < dest.len() && base[shared] == dest[shared] {
        shared += 1;
    }
    if shared == 0 {
        return target.to_string_lossy().into_owned();
    }

    let mut segments: Vec<String> = Vec::new();
    for _ in shared..base.len() {
        segments.push("..".to_string());
    }
    for component in &dest[shared..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }
    format!("{}{}", RELATIVE_PREFIX, segments.join("/"))
}

/// Returns the final path segment of a link path, or `None` when the path
/// names no file (empty, or ends in a separator).
pub fn link_basename(link_path: &str) -> Option<&str> {
    let trimmed = link_path
        .strip_prefix(RELATIVE_PREFIX)
        .unwrap_or(link_path);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
}

/// Writes data atomically by using a temporary sibling file followed by rename.
/// 以臨時檔案搭配 rename 實現原子寫入。
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
