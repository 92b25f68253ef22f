use std::fs;
use std::path::Path;

use stagehand_core::{promote, ProjectDocument, PromoteError, PromotionConfig};
use tempfile::tempdir;

fn write_document(path: &Path, libraries: &[(&str, &str)]) {
    let libraries: Vec<_> = libraries
        .iter()
        .map(|(name, filepath)| serde_json::json!({ "name": name, "filepath": filepath }))
        .collect();
    let payload = serde_json::json!({ "format_version": 1, "libraries": libraries });
    fs::write(path, serde_json::to_vec_pretty(&payload).unwrap()).unwrap();
}

/// Project tree used throughout: `assets` sits two ancestor hops above the
/// edit folder holding the shot file.
///
/// ```text
/// root/
///   assets/
///   sequences/
///     edit/
///       shot010.scene
/// ```
fn standard_tree(root: &Path) -> std::path::PathBuf {
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::create_dir_all(root.join("sequences/edit")).unwrap();
    root.join("sequences/edit/shot010.scene")
}

#[test]
fn promotion_reaches_done_and_restores_links() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let shot = standard_tree(root);
    fs::write(root.join("assets/chars.scene"), b"x").unwrap();
    fs::write(root.join("assets/props.scene"), b"x").unwrap();

    let original_links = [
        ("chars", "//../../wip/chars.scene"),
        ("props", "/somewhere/else/props.scene"),
    ];
    write_document(&shot, &original_links);

    let mut doc = ProjectDocument::open(&shot).unwrap();
    let outcome = promote(&mut doc, &PromotionConfig::default()).unwrap();

    assert_eq!(outcome.production_dir, root.join("assets"));
    assert_eq!(outcome.promoted_path, root.join("assets/shot010.scene"));
    assert!(outcome.promoted_path.is_file());

    // The live session's link paths are back to their original values.
    for (link, (_, original)) in doc.libraries().iter().zip(original_links.iter()) {
        assert_eq!(link.filepath, *original);
    }

    // The promoted copy carries production-local link paths.
    let promoted = ProjectDocument::open(&outcome.promoted_path).unwrap();
    assert_eq!(promoted.libraries()[0].filepath, "//chars.scene");
    assert_eq!(promoted.libraries()[1].filepath, "//props.scene");
}

#[test]
fn missing_linked_library_rejects_without_mutation() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let shot = standard_tree(root);
    fs::write(root.join("assets/chars.scene"), b"x").unwrap();
    // props.scene deliberately absent from assets.

    write_document(
        &shot,
        &[
            ("chars", "//../../wip/chars.scene"),
            ("props", "//../../wip/props.scene"),
        ],
    );

    let mut doc = ProjectDocument::open(&shot).unwrap();
    match promote(&mut doc, &PromotionConfig::default()) {
        Err(PromoteError::BrokenLinkedLibraries(names)) => {
            assert_eq!(names, vec!["props"]);
        }
        other => panic!("expected BrokenLinkedLibraries, got {other:?}"),
    }

    // No link path was ever touched and nothing was written to assets.
    assert_eq!(doc.libraries()[0].filepath, "//../../wip/chars.scene");
    assert_eq!(doc.libraries()[1].filepath, "//../../wip/props.scene");
    assert!(!root.join("assets/shot010.scene").exists());
}

#[test]
fn files_outside_an_edit_folder_are_rejected() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::create_dir_all(root.join("sequences/shots")).unwrap();
    let shot = root.join("sequences/shots/shot010.scene");
    write_document(&shot, &[]);

    let mut doc = ProjectDocument::open(&shot).unwrap();
    match promote(&mut doc, &PromotionConfig::default()) {
        Err(PromoteError::NotInEditFolder(name)) => assert_eq!(name, "edit"),
        other => panic!("expected NotInEditFolder, got {other:?}"),
    }
    assert!(!root.join("assets/shot010.scene").exists());
}

#[test]
fn missing_production_folder_is_reported() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("sequences/edit")).unwrap();
    let shot = root.join("sequences/edit/shot010.scene");
    write_document(&shot, &[]);

    let mut doc = ProjectDocument::open(&shot).unwrap();
    match promote(&mut doc, &PromotionConfig::default()) {
        Err(PromoteError::NoProductionFolderFound(name)) => assert_eq!(name, "assets"),
        other => panic!("expected NoProductionFolderFound, got {other:?}"),
    }
}

#[test]
fn promotion_is_repeatable_on_an_already_promoted_file() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let shot = standard_tree(root);
    fs::write(root.join("assets/chars.scene"), b"x").unwrap();
    write_document(&shot, &[("chars", "//../../wip/chars.scene")]);

    let mut doc = ProjectDocument::open(&shot).unwrap();
    let first = promote(&mut doc, &PromotionConfig::default()).unwrap();
    let second = promote(&mut doc, &PromotionConfig::default()).unwrap();

    assert_eq!(first.promoted_path, second.promoted_path);
    assert!(second.promoted_path.is_file());
    assert_eq!(doc.libraries()[0].filepath, "//../../wip/chars.scene");
}

#[test]
fn search_depth_bounds_both_lookups() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    // Edit folder four hops above the document directory.
    fs::create_dir_all(root.join("edit/a/b/c")).unwrap();
    fs::create_dir_all(root.join("edit/a/assets")).unwrap();
    let shot = root.join("edit/a/b/c/shot010.scene");
    write_document(&shot, &[]);

    let mut doc = ProjectDocument::open(&shot).unwrap();
    let shallow = PromotionConfig {
        search_depth: 3,
        ..PromotionConfig::default()
    };
    match promote(&mut doc, &shallow) {
        Err(PromoteError::NotInEditFolder(_)) => {}
        other => panic!("expected NotInEditFolder, got {other:?}"),
    }

    let deep = PromotionConfig {
        search_depth: 4,
        ..PromotionConfig::default()
    };
    let outcome = promote(&mut doc, &deep).unwrap();
    assert_eq!(outcome.production_dir, root.join("edit/a/assets"));
}

#[test]
fn save_failure_still_restores_links() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let shot = standard_tree(root);
    fs::write(root.join("assets/chars.scene"), b"x").unwrap();
    write_document(&shot, &[("chars", "//../../wip/chars.scene")]);

    let mut doc = ProjectDocument::open(&shot).unwrap();

    // A directory squatting on the target path makes the copy save fail.
    fs::create_dir(root.join("assets/shot010.scene")).unwrap();

    match promote(&mut doc, &PromotionConfig::default()) {
        Err(PromoteError::SaveFailed(_)) => {}
        other => panic!("expected SaveFailed, got {other:?}"),
    }
    // The restore step ran even though the save failed.
    assert_eq!(doc.libraries()[0].filepath, "//../../wip/chars.scene");
}
