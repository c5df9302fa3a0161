use super::*;
use crate::models::FileTree;

fn tree_with_files(names: &[&str]) -> (FileTree, Vec<NodeId>) {
    let mut tree = FileTree::new();
    let ids = names
        .iter()
        .map(|name| tree.create_file(None, name, format!("// {name}")).unwrap())
        .collect();
    (tree, ids)
}

fn doc(tree: &FileTree, id: NodeId) -> OpenDocument {
    OpenDocument::from_node(tree.get(id).unwrap()).unwrap()
}

#[test]
fn from_node_rejects_folders() {
    let mut tree = FileTree::new();
    let folder = tree.create_folder(None, "src").unwrap();
    assert!(OpenDocument::from_node(tree.get(folder).unwrap()).is_none());
}

#[test]
fn open_appends_and_activates_without_duplicates() {
    let (tree, ids) = tree_with_files(&["a.js", "b.js"]);
    let mut docs = OpenDocumentSet::new();

    assert!(docs.open(doc(&tree, ids[0])));
    assert!(docs.open(doc(&tree, ids[1])));
    assert_eq!(docs.active_id(), Some(ids[1]));

    assert!(!docs.open(doc(&tree, ids[0])));
    assert_eq!(docs.len(), 2);
    assert_eq!(docs.active_id(), Some(ids[0]));
}

#[test]
fn close_active_selects_preceding_tab() {
    let (tree, ids) = tree_with_files(&["a.js", "b.js", "c.js"]);
    let mut docs = OpenDocumentSet::new();
    for &id in &ids {
        docs.open(doc(&tree, id));
    }

    docs.set_active(ids[1]);
    assert!(docs.close(ids[1]));
    assert_eq!(docs.active_id(), Some(ids[0]));
}

#[test]
fn close_first_active_selects_new_first() {
    let (tree, ids) = tree_with_files(&["a.js", "b.js"]);
    let mut docs = OpenDocumentSet::new();
    docs.open(doc(&tree, ids[0]));
    docs.open(doc(&tree, ids[1]));
    docs.set_active(ids[0]);

    docs.close(ids[0]);
    assert_eq!(docs.active_id(), Some(ids[1]));
}

#[test]
fn close_inactive_keeps_active() {
    let (tree, ids) = tree_with_files(&["a.js", "b.js"]);
    let mut docs = OpenDocumentSet::new();
    docs.open(doc(&tree, ids[0]));
    docs.open(doc(&tree, ids[1]));

    docs.close(ids[0]);
    assert_eq!(docs.active_id(), Some(ids[1]));
}

#[test]
fn close_only_document_clears_active() {
    let (tree, ids) = tree_with_files(&["a.js"]);
    let mut docs = OpenDocumentSet::new();
    docs.open(doc(&tree, ids[0]));

    assert!(docs.close(ids[0]));
    assert!(docs.active().is_none());
    assert!(docs.is_empty());
    assert!(!docs.close(ids[0]));
}

#[test]
fn close_removed_uses_first_remaining() {
    let (tree, ids) = tree_with_files(&["a.js", "b.js", "c.js", "d.js"]);
    let mut docs = OpenDocumentSet::new();
    for &id in &ids {
        docs.open(doc(&tree, id));
    }
    docs.set_active(ids[2]);

    let closed = docs.close_removed(&[ids[1], ids[2]]);

    assert_eq!(closed, vec![ids[1], ids[2]]);
    assert_eq!(docs.active_id(), Some(ids[0]));
    let remaining: Vec<_> = docs.iter().map(|d| d.id).collect();
    assert_eq!(remaining, vec![ids[0], ids[3]]);
}

#[test]
fn refresh_updates_cached_name_and_path() {
    let mut tree = FileTree::new();
    let src = tree.create_folder(None, "src").unwrap();
    let file = tree.create_file(Some(src), "a.js", "").unwrap();
    let mut docs = OpenDocumentSet::new();
    docs.open(doc(&tree, file));

    tree.rename(src, "lib").unwrap();
    assert!(docs.refresh(tree.get(file).unwrap()));
    assert_eq!(docs.get(file).unwrap().path, "lib/a.js");
    assert!(!docs.refresh(tree.get(file).unwrap()));
}

#[test]
fn set_content_reports_changes() {
    let (tree, ids) = tree_with_files(&["a.js"]);
    let mut docs = OpenDocumentSet::new();
    docs.open(doc(&tree, ids[0]));

    assert!(docs.set_content(ids[0], "new"));
    assert!(!docs.set_content(ids[0], "new"));
    assert_eq!(docs.active().unwrap().content, "new");
}
