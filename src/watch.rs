use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{ModifyKind, RenameMode},
};
use tracing::warn;

use crate::{
    error::AppError,
    hub::NotificationHub,
    models::{
        events::{ChangeEvent, ChangeKind},
        files::FileNode,
    },
    tree,
};

/// Watch the workspace recursively and fan filesystem changes out through the
/// hub. The returned watcher must be kept alive for the server's lifetime.
pub fn spawn(root: PathBuf, hub: Arc<NotificationHub>) -> Result<RecommendedWatcher, AppError> {
    let watch_root = root.clone();
    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for change in change_events(&root, &event) {
                    hub.broadcast(&change);
                }
            }
            Err(err) => warn!(error = %err, "file watcher error"),
        })?;

    watcher.watch(&watch_root, RecursiveMode::Recursive)?;
    Ok(watcher)
}

/// Map one raw watcher event to the change notifications clients understand.
/// Only visible markdown files are forwarded; a rename becomes a removal of
/// the old path plus an addition of the new one.
fn change_events(root: &Path, event: &Event) -> Vec<ChangeEvent> {
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if let [from, to] = event.paths.as_slice() {
            return change_for(root, from, ChangeKind::FileRemoved)
                .into_iter()
                .chain(change_for(root, to, ChangeKind::FileAdded))
                .collect();
        }
        return Vec::new();
    }

    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::FileAdded,
        EventKind::Remove(_) => ChangeKind::FileRemoved,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::FileRemoved,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeKind::FileAdded,
        EventKind::Modify(_) => ChangeKind::FileChanged,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter_map(|path| change_for(root, path, kind))
        .collect()
}

fn change_for(root: &Path, path: &Path, kind: ChangeKind) -> Option<ChangeEvent> {
    if !tree::is_markdown(path) {
        return None;
    }

    let relative = path.strip_prefix(root).ok()?;
    if relative
        .components()
        .any(|part| part.as_os_str().to_string_lossy().starts_with('.'))
    {
        return None;
    }

    let relative = relative.to_string_lossy().replace('\\', "/");
    let node = (kind == ChangeKind::FileAdded).then(|| {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| relative.clone());
        FileNode::file(name, relative.clone())
    });

    Some(ChangeEvent {
        kind,
        path: relative,
        node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(path.to_path_buf());
        }
        event
    }

    #[test]
    fn create_maps_to_added_with_node_snapshot() {
        let root = Path::new("/docs");
        let raw = event(
            EventKind::Create(CreateKind::File),
            &[Path::new("/docs/guides/new.md")],
        );

        let changes = change_events(root, &raw);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::FileAdded);
        assert_eq!(changes[0].path, "guides/new.md");
        let node = changes[0].node.as_ref().unwrap();
        assert_eq!(node.name, "new.md");
        assert!(node.children.is_none());
    }

    #[test]
    fn modify_and_remove_map_without_node_snapshots() {
        let root = Path::new("/docs");

        let changed = change_events(
            root,
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                &[Path::new("/docs/a.md")],
            ),
        );
        assert_eq!(changed[0].kind, ChangeKind::FileChanged);
        assert!(changed[0].node.is_none());

        let removed = change_events(
            root,
            &event(
                EventKind::Remove(RemoveKind::File),
                &[Path::new("/docs/a.md")],
            ),
        );
        assert_eq!(removed[0].kind, ChangeKind::FileRemoved);
    }

    #[test]
    fn rename_splits_into_removal_and_addition() {
        let root = Path::new("/docs");
        let raw = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[Path::new("/docs/old.md"), Path::new("/docs/new.md")],
        );

        let changes = change_events(root, &raw);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::FileRemoved);
        assert_eq!(changes[0].path, "old.md");
        assert_eq!(changes[1].kind, ChangeKind::FileAdded);
        assert_eq!(changes[1].path, "new.md");
    }

    #[test]
    fn non_markdown_and_hidden_paths_are_dropped() {
        let root = Path::new("/docs");

        let ignored = change_events(
            root,
            &event(
                EventKind::Create(CreateKind::File),
                &[Path::new("/docs/image.png")],
            ),
        );
        assert!(ignored.is_empty());

        let hidden = change_events(
            root,
            &event(
                EventKind::Create(CreateKind::File),
                &[Path::new("/docs/.drafts/wip.md")],
            ),
        );
        assert!(hidden.is_empty());

        let outside = change_events(
            root,
            &event(
                EventKind::Create(CreateKind::File),
                &[Path::new("/elsewhere/a.md")],
            ),
        );
        assert!(outside.is_empty());
    }
}
