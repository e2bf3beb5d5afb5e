use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::{
    content::split_frontmatter,
    error::AppError,
    models::files::{FileContent, FileNode},
    tree,
};

/// Read-only facade over the workspace: tree listing, document content with
/// front-matter extraction, and raw asset bytes. Every operation re-touches
/// the filesystem; there is no cache and no shared mutable state.
#[derive(Debug, Clone)]
pub struct FileService {
    root: PathBuf,
}

impl FileService {
    pub fn new(root: &Path) -> Result<Self, AppError> {
        let root = root.canonicalize().map_err(|err| {
            AppError::Config(format!("invalid workspace root {}: {err}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list_tree(&self) -> Result<FileNode, AppError> {
        tree::build_tree(&self.root)
    }

    /// Read one markdown document, splitting front-matter from its body.
    /// `path` in the result echoes the requested relative path.
    pub async fn get_document(&self, relative: &str) -> Result<FileContent, AppError> {
        let full = self.resolve(relative)?;

        let metadata = fs::metadata(&full)
            .await
            .map_err(|_| AppError::NotFound(format!("file {relative}")))?;
        if !metadata.is_file() {
            return Err(AppError::NotFound(format!("file {relative}")));
        }

        let bytes = fs::read(&full)
            .await
            .map_err(|_| AppError::NotFound(format!("file {relative}")))?;
        let raw = String::from_utf8_lossy(&bytes);
        let (frontmatter, content) = split_frontmatter(&raw);

        Ok(FileContent {
            path: relative.to_string(),
            content,
            frontmatter,
        })
    }

    /// Read a referenced asset (image or other binary) verbatim. No text
    /// decoding, no extraction.
    pub async fn get_asset(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        let full = self.resolve(relative)?;

        let metadata = fs::metadata(&full)
            .await
            .map_err(|_| AppError::NotFound(format!("asset {relative}")))?;
        if !metadata.is_file() {
            return Err(AppError::NotFound(format!("asset {relative}")));
        }

        fs::read(&full)
            .await
            .map_err(|_| AppError::NotFound(format!("asset {relative}")))
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        if !is_path_safe(&self.root, relative) {
            return Err(AppError::Forbidden(relative.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Check that `requested`, resolved against `root`, stays inside `root`.
///
/// Purely lexical: the joined path is normalized by collapsing `.` and `..`
/// segments without touching the filesystem, then compared component-wise so
/// a sibling with a shared name prefix (`/a/bc` under root `/a/b`) is
/// rejected.
pub fn is_path_safe(root: &Path, requested: &str) -> bool {
    let normalized = normalize_lexically(&root.join(requested));
    normalized == root || normalized.starts_with(root)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
