use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::model::LayoutDefinition;

const BUILTIN_LAYOUTS_JSON: &str = include_str!("builtin_layouts.json");

/// On-disk shape of a layout catalog file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutFile {
    /// Id used when a requested layout is unknown. Optional for files merged into another
    /// catalog.
    #[serde(default)]
    pub default: Option<String>,
    pub layouts: Vec<LayoutDefinition>,
}

/// Immutable set of named layouts with a designated default.
///
/// Built once at startup and shared read-only between renders.
#[derive(Clone, Debug)]
pub struct LayoutCatalog {
    layouts: Vec<LayoutDefinition>,
    default_index: usize,
}

impl LayoutCatalog {
    /// The layouts shipped with the crate.
    pub fn builtin() -> ThumbResult<Self> {
        Self::from_json_str(BUILTIN_LAYOUTS_JSON)
    }

    /// Parse and validate a catalog from JSON. The file must name a default.
    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let file: LayoutFile = serde_json::from_str(s)
            .map_err(|e| ThumbError::serde(format!("parse layout catalog JSON: {e}")))?;
        Self::from_file_def(file)
    }

    /// Read a catalog file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let file = read_layout_file(path.as_ref())?;
        Self::from_file_def(file)
    }

    fn from_file_def(file: LayoutFile) -> ThumbResult<Self> {
        let default_id = file
            .default
            .ok_or_else(|| ThumbError::validation("layout catalog must name a default layout"))?;
        let default_index = validate_layouts(&file.layouts, &default_id)?;
        Ok(Self {
            layouts: file.layouts,
            default_index,
        })
    }

    /// Merge layouts from a file on disk; entries with an existing id replace it. A `default`
    /// in the file replaces the current default.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> ThumbResult<Self> {
        let file = read_layout_file(path.as_ref())?;
        for layout in file.layouts {
            match self.layouts.iter_mut().find(|l| l.id == layout.id) {
                Some(slot) => *slot = layout,
                None => self.layouts.push(layout),
            }
        }
        let default_id = file
            .default
            .unwrap_or_else(|| self.default_id().to_owned());
        self.default_index = validate_layouts(&self.layouts, &default_id)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&LayoutDefinition> {
        self.layouts.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The designated default layout.
    pub fn default_layout(&self) -> &LayoutDefinition {
        &self.layouts[self.default_index]
    }

    /// Look up `id`, falling back to the default layout when it is unknown.
    pub fn get_or_default(&self, id: &str) -> &LayoutDefinition {
        match self.get(id) {
            Some(l) => l,
            None => {
                tracing::warn!(layout = id, fallback = self.default_id(), "unknown layout id");
                self.default_layout()
            }
        }
    }

    pub fn default_id(&self) -> &str {
        &self.default_layout().id
    }

    /// Layouts in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutDefinition> {
        self.layouts.iter()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always `false`: a catalog holds at least its default layout.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Validate every layout, reject duplicate ids, and return the index of `default_id`.
fn validate_layouts(layouts: &[LayoutDefinition], default_id: &str) -> ThumbResult<usize> {
    let mut seen = BTreeSet::new();
    for layout in layouts {
        layout.validate()?;
        if !seen.insert(layout.id.as_str()) {
            return Err(ThumbError::validation(format!(
                "duplicate layout id '{}'",
                layout.id
            )));
        }
    }
    layouts
        .iter()
        .position(|l| l.id == default_id)
        .ok_or_else(|| {
            ThumbError::validation(format!(
                "default layout '{default_id}' is not in the catalog"
            ))
        })
}

fn read_layout_file(path: &Path) -> ThumbResult<LayoutFile> {
    let f = File::open(path).map_err(|e| {
        ThumbError::validation(format!("open layout catalog '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        ThumbError::serde(format!(
            "parse layout catalog '{}': {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/catalog.rs"]
mod tests;
