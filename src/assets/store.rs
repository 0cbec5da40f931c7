use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::{ImageHandle, decode_image};
use crate::content::config::ContentConfig;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Decoded images for one render, keyed by image element id.
///
/// An id with no entry means "asset absent": the render pass skips that element.
#[derive(Clone, Debug, Default)]
pub struct ResolvedAssets {
    images: HashMap<String, ImageHandle>,
    background: Option<ImageHandle>,
}

impl ResolvedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `source` / `image_url` in `content` from files under `root`.
    ///
    /// Sources must be relative paths. Anything that fails to read or decode is logged and left
    /// absent; this never fails as a whole.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn resolve(content: &ContentConfig, root: impl AsRef<Path>) -> Self {
        let loader = FileLoader {
            root: root.as_ref().to_path_buf(),
        };
        let mut out = Self::new();

        for image in &content.images {
            let Some(source) = image.source.as_deref() else {
                continue;
            };
            match loader.load(source) {
                Ok(handle) => {
                    out.images.insert(image.id.clone(), handle);
                }
                Err(err) => {
                    tracing::warn!(id = %image.id, source, error = %err, "image asset unavailable");
                }
            }
        }

        if let Some(url) = content.background.image_url.as_deref() {
            match loader.load(url) {
                Ok(handle) => out.background = Some(handle),
                Err(err) => {
                    tracing::warn!(source = url, error = %err, "background image unavailable");
                }
            }
        }

        out
    }

    pub fn insert_image(&mut self, id: impl Into<String>, handle: ImageHandle) {
        self.images.insert(id.into(), handle);
    }

    pub fn with_image(mut self, id: impl Into<String>, handle: ImageHandle) -> Self {
        self.insert_image(id, handle);
        self
    }

    pub fn set_background(&mut self, handle: Option<ImageHandle>) {
        self.background = handle;
    }

    pub fn with_background(mut self, handle: ImageHandle) -> Self {
        self.background = Some(handle);
        self
    }

    pub fn image(&self, id: &str) -> Option<&ImageHandle> {
        self.images.get(id)
    }

    pub fn background(&self) -> Option<&ImageHandle> {
        self.background.as_ref()
    }

    pub fn len(&self) -> usize {
        self.images.len() + usize::from(self.background.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    fn load(&self, source: &str) -> ThumbResult<ImageHandle> {
        let norm = normalize_rel_path(source)?;
        let path = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))?;
        decode_image(&bytes)
            .map_err(|e| ThumbError::asset(format!("decode '{}': {e}", path.display())))
    }
}

/// Normalize and validate an asset path relative to the assets root.
///
/// The result uses `/` separators and drops `.` segments. Absolute paths and `..` are rejected.
pub fn normalize_rel_path(source: &str) -> ThumbResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(ThumbError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.as_bytes().get(1) == Some(&b':') {
        return Err(ThumbError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(ThumbError::validation("asset paths must not contain '..'")),
            p => out.push(p),
        }
    }
    if out.is_empty() {
        return Err(ThumbError::validation("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
