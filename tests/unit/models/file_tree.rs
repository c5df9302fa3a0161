use super::*;

fn sample_tree() -> (FileTree, NodeId, NodeId, NodeId) {
    let mut tree = FileTree::new();
    let src = tree.create_folder(None, "src").unwrap();
    let utils = tree.create_folder(Some(src), "utils").unwrap();
    let file = tree
        .create_file(Some(utils), "math.js", "export const add = (a, b) => a + b;")
        .unwrap();
    (tree, src, utils, file)
}

#[test]
fn test_new_tree() {
    let tree = FileTree::new();
    assert!(tree.is_empty());
    assert!(tree.roots().is_empty());
    assert!(tree.verify_paths());
}

#[test]
fn test_create_at_root_and_nested() {
    let (tree, src, utils, file) = sample_tree();

    assert_eq!(tree.roots(), &[src]);
    assert_eq!(tree.get(src).unwrap().path(), "src");
    assert_eq!(tree.get(utils).unwrap().path(), "src/utils");
    assert_eq!(tree.get(file).unwrap().path(), "src/utils/math.js");
    assert_eq!(tree.get(file).unwrap().parent(), Some(utils));
    assert_eq!(tree.get(utils).unwrap().children(), &[file]);
    assert!(tree.verify_paths());
}

#[test]
fn test_children_keep_insertion_order() {
    let mut tree = FileTree::new();
    let root = tree.create_folder(None, "root").unwrap();
    let z = tree.create_file(Some(root), "z.txt", "").unwrap();
    let a = tree.create_file(Some(root), "a.txt", "").unwrap();
    let m = tree.create_folder(Some(root), "m").unwrap();

    assert_eq!(tree.get(root).unwrap().children(), &[z, a, m]);
}

#[test]
fn test_duplicate_names_are_permitted() {
    let mut tree = FileTree::new();
    let first = tree.create_file(None, "a.js", "one").unwrap();
    let second = tree.create_file(None, "a.js", "two").unwrap();

    assert_ne!(first, second);
    assert_eq!(tree.find_by_path("a.js").unwrap().id(), first);
}

#[test]
fn test_create_under_missing_or_file_parent() {
    let (mut tree, _, _, file) = sample_tree();

    let err = tree.create_file(Some(file), "x.js", "").unwrap_err();
    assert_eq!(err, FileTreeError::InvalidTarget(TargetError::NotAFolder));

    tree.remove(file).unwrap();
    let err = tree.create_folder(Some(file), "x").unwrap_err();
    assert_eq!(err, FileTreeError::NotFound);
}

#[test]
fn test_invalid_names_rejected() {
    let mut tree = FileTree::new();
    assert!(matches!(
        tree.create_file(None, "  ", ""),
        Err(FileTreeError::InvalidName(_))
    ));
    assert!(matches!(
        tree.create_folder(None, "a/b"),
        Err(FileTreeError::InvalidName(_))
    ));
    assert!(tree.is_empty());
}

#[test]
fn test_rename_folder_rewrites_subtree() {
    let (mut tree, src, utils, file) = sample_tree();

    let rewritten = tree.rename(src, "lib").unwrap();

    assert_eq!(rewritten, vec![src, utils, file]);
    assert_eq!(tree.get(src).unwrap().path(), "lib");
    assert_eq!(tree.get(utils).unwrap().path(), "lib/utils");
    assert_eq!(tree.get(file).unwrap().path(), "lib/utils/math.js");
    assert!(tree.verify_paths());
}

#[test]
fn test_rename_file_preserves_extension() {
    let (mut tree, _, _, file) = sample_tree();

    tree.rename(file, "algebra").unwrap();
    assert_eq!(tree.get(file).unwrap().name(), "algebra.js");

    tree.rename(file, "algebra.ts").unwrap();
    assert_eq!(tree.get(file).unwrap().name(), "algebra.ts");
    assert_eq!(tree.get(file).unwrap().path(), "src/utils/algebra.ts");
}

#[test]
fn test_rename_folder_does_not_add_extension() {
    let mut tree = FileTree::new();
    let folder = tree.create_folder(None, "v1.0").unwrap();
    tree.rename(folder, "next").unwrap();
    assert_eq!(tree.get(folder).unwrap().name(), "next");
}

#[test]
fn test_rename_missing_node() {
    let (mut tree, _, _, file) = sample_tree();
    tree.remove(file).unwrap();
    assert_eq!(tree.rename(file, "x").unwrap_err(), FileTreeError::NotFound);
}

#[test]
fn test_remove_folder_removes_subtree() {
    let (mut tree, src, utils, file) = sample_tree();
    let other = tree.create_file(None, "README.md", "# hi").unwrap();

    let removed = tree.remove(src).unwrap();

    assert_eq!(removed, vec![src, utils, file]);
    assert_eq!(tree.roots(), &[other]);
    assert_eq!(tree.len(), 1);
    assert!(tree.get(file).is_none());
    assert_eq!(tree.find_by_id(utils).unwrap_err(), FileTreeError::NotFound);
    assert!(tree.verify_paths());
}

#[test]
fn test_move_rewrites_paths_and_appends() {
    let (mut tree, src, utils, file) = sample_tree();
    let docs = tree.create_folder(None, "docs").unwrap();
    let guide = tree.create_file(Some(docs), "guide.md", "").unwrap();

    let rewritten = tree.move_to(utils, Some(docs)).unwrap();

    assert_eq!(rewritten, vec![utils, file]);
    assert_eq!(tree.get(docs).unwrap().children(), &[guide, utils]);
    assert!(tree.get(src).unwrap().children().is_empty());
    assert_eq!(tree.get(file).unwrap().path(), "docs/utils/math.js");
    assert!(tree.verify_paths());

    tree.move_to(file, None).unwrap();
    assert_eq!(tree.get(file).unwrap().path(), "math.js");
    assert_eq!(tree.roots(), &[src, docs, file]);
    assert!(tree.verify_paths());
}

#[test]
fn test_move_into_self_or_descendant_is_rejected() {
    let (mut tree, src, utils, file) = sample_tree();
    let before: Vec<_> = tree.walk().collect();

    assert_eq!(
        tree.move_to(src, Some(src)).unwrap_err(),
        FileTreeError::InvalidTarget(TargetError::MoveIntoSelf)
    );
    assert_eq!(
        tree.move_to(src, Some(utils)).unwrap_err(),
        FileTreeError::InvalidTarget(TargetError::MoveIntoDescendant)
    );
    assert_eq!(
        tree.move_to(utils, Some(file)).unwrap_err(),
        FileTreeError::InvalidTarget(TargetError::NotAFolder)
    );

    let after: Vec<_> = tree.walk().collect();
    assert_eq!(before, after);
    assert_eq!(tree.get(utils).unwrap().path(), "src/utils");
}

#[test]
fn test_find_by_path_exact_match() {
    let (tree, _, utils, file) = sample_tree();

    assert_eq!(tree.find_by_path("src/utils").unwrap().id(), utils);
    assert_eq!(tree.find_by_path("src/utils/math.js").unwrap().id(), file);
    assert_eq!(
        tree.find_by_path("src/utils/*.js").unwrap_err(),
        FileTreeError::NotFound
    );
    assert_eq!(
        tree.find_by_path("utils/math.js").unwrap_err(),
        FileTreeError::NotFound
    );
}

#[test]
fn test_set_content_only_on_files() {
    let (mut tree, src, _, file) = sample_tree();

    tree.set_content(file, "changed").unwrap();
    assert_eq!(tree.get(file).unwrap().content(), Some("changed"));
    assert_eq!(
        tree.set_content(src, "nope").unwrap_err(),
        FileTreeError::InvalidTarget(TargetError::NotAFile)
    );
}

#[test]
fn test_walk_and_files_pre_order() {
    let (mut tree, src, utils, file) = sample_tree();
    let readme = tree.create_file(None, "README.md", "").unwrap();
    let index = tree.create_file(Some(src), "index.js", "").unwrap();

    let walked: Vec<_> = tree.walk().collect();
    assert_eq!(walked, vec![src, utils, file, index, readme]);

    let files: Vec<_> = tree.files().map(|n| n.id()).collect();
    assert_eq!(files, vec![file, index, readme]);
}

#[test]
fn test_toggle_expand() {
    let (mut tree, src, _, file) = sample_tree();

    assert!(!tree.is_expanded(src));
    tree.toggle_expand(src);
    assert!(tree.is_expanded(src));
    tree.toggle_expand(src);
    assert!(!tree.is_expanded(src));

    tree.toggle_expand(file);
    assert!(!tree.is_expanded(file));
}

#[test]
fn test_flatten_for_view() {
    let (mut tree, src, utils, _) = sample_tree();
    tree.create_file(None, "README.md", "").unwrap();

    let rows = tree.flatten_for_view();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].kind, NodeKind::Folder);
    assert_eq!(rows[1].name, "README.md");

    tree.expand(src);
    tree.expand(utils);
    let rows = tree.flatten_for_view();
    let names: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.depth)).collect();
    assert_eq!(
        names,
        vec![("src", 0), ("utils", 1), ("math.js", 2), ("README.md", 0)]
    );
}

#[test]
fn test_path_invariant_holds_across_mixed_operations() {
    let mut tree = FileTree::new();
    let a = tree.create_folder(None, "a").unwrap();
    let b = tree.create_folder(Some(a), "b").unwrap();
    let c = tree.create_folder(None, "c").unwrap();
    let f = tree.create_file(Some(b), "f.rs", "").unwrap();
    assert!(tree.verify_paths());

    tree.move_to(b, Some(c)).unwrap();
    assert!(tree.verify_paths());
    tree.rename(c, "cc").unwrap();
    assert!(tree.verify_paths());
    tree.move_to(a, Some(b)).unwrap();
    assert!(tree.verify_paths());
    tree.rename(f, "g").unwrap();
    assert!(tree.verify_paths());

    assert_eq!(tree.get(f).unwrap().path(), "cc/b/g.rs");
    assert_eq!(tree.get(a).unwrap().path(), "cc/b/a");
}
