use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::{
    error::AppError,
    models::files::{FileNode, NodeKind},
};

/// Build the navigation tree for every markdown document under `root`.
///
/// The tree is rebuilt from disk on every call; nothing is cached. The root
/// node is a synthetic directory named after the workspace directory with an
/// empty relative path.
pub fn build_tree(root: &Path) -> Result<FileNode, AppError> {
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());
    let mut tree = FileNode::directory(name, "");

    for path in discover_markdown_files(root)? {
        insert_into_tree(&mut tree, &path);
    }

    Ok(tree)
}

/// Recursively enumerate markdown files under `root` as `/`-separated
/// relative paths, in discovery order. Hidden entries are skipped at any
/// depth; symlinks are not followed, so traversal cycles cannot occur.
fn discover_markdown_files(root: &Path) -> Result<Vec<String>, AppError> {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| AppError::Discovery(err.to_string()))?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(relative.to_string_lossy().replace('\\', "/"));
    }

    Ok(files)
}

/// Insert one discovered relative path, creating intermediate directory nodes
/// as needed. Re-inserting an already-present path is a no-op.
fn insert_into_tree(root: &mut FileNode, file_path: &str) {
    let parts: Vec<&str> = file_path.split('/').collect();
    let mut current = root;

    for (index, part) in parts.iter().enumerate() {
        let is_file = index == parts.len() - 1;
        let path = parts[..=index].join("/");
        let children = current.children.get_or_insert_with(Vec::new);

        let position = match children.iter().position(|child| child.name == *part) {
            Some(position) => position,
            None => {
                let node = if is_file {
                    FileNode::file(*part, path)
                } else {
                    FileNode::directory(*part, path)
                };
                children.push(node);
                children.len() - 1
            }
        };

        if is_file {
            break;
        }
        current = &mut children[position];
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Markdown extension match is case-sensitive: `README.MD` is not served.
pub(crate) fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn child<'a>(node: &'a FileNode, name: &str) -> &'a FileNode {
        node.children
            .as_ref()
            .and_then(|children| children.iter().find(|child| child.name == name))
            .unwrap_or_else(|| panic!("missing child {name}"))
    }

    #[test]
    fn builds_nested_tree_from_discovered_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# a").unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("x/b.md"), "# b").unwrap();
        fs::write(dir.path().join("x/y/c.md"), "# c").unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree.kind, NodeKind::Directory);
        assert_eq!(tree.path, "");
        assert_eq!(tree.children.as_ref().unwrap().len(), 2);

        let a = child(&tree, "a.md");
        assert_eq!(a.kind, NodeKind::File);
        assert_eq!(a.path, "a.md");
        assert!(a.children.is_none());

        let x = child(&tree, "x");
        assert_eq!(x.kind, NodeKind::Directory);
        assert_eq!(x.path, "x");
        assert_eq!(x.children.as_ref().unwrap().len(), 2);
        assert_eq!(child(x, "b.md").path, "x/b.md");

        let y = child(x, "y");
        assert_eq!(y.path, "x/y");
        assert_eq!(y.children.as_ref().unwrap().len(), 1);
        assert_eq!(child(y, "c.md").path, "x/y/c.md");
    }

    #[test]
    fn duplicate_insertion_is_idempotent() {
        let mut tree = FileNode::directory("root", "");
        insert_into_tree(&mut tree, "x/b.md");
        insert_into_tree(&mut tree, "x/b.md");

        let x = child(&tree, "x");
        assert_eq!(tree.children.as_ref().unwrap().len(), 1);
        assert_eq!(x.children.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn skips_non_markdown_and_hidden_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.md"), "# doc").unwrap();
        fs::write(dir.path().join("notes.markdown"), "# notes").unwrap();
        fs::write(dir.path().join("readme.txt"), "not markdown").unwrap();
        fs::write(dir.path().join("SHOUTY.MD"), "wrong case").unwrap();
        fs::write(dir.path().join(".hidden.md"), "hidden").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config.md"), "hidden dir").unwrap();

        let tree = build_tree(dir.path()).unwrap();
        let names: Vec<&str> = tree
            .children
            .as_ref()
            .unwrap()
            .iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"doc.md"));
        assert!(names.contains(&"notes.markdown"));
    }

    #[test]
    fn empty_workspace_yields_childless_root() {
        let dir = tempdir().unwrap();
        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree.kind, NodeKind::Directory);
        assert!(tree.children.as_ref().unwrap().is_empty());
    }

    #[test]
    fn missing_root_fails_discovery() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        let result = build_tree(&gone);
        assert!(matches!(result, Err(AppError::Discovery(_))));
    }
}
