use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{ThumbError, ThumbResult};

const BUILTIN_PRESETS_JSON: &str = include_str!("builtin_presets.json");

/// Output size for a target platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Preset {
    pub fn canvas(&self) -> ThumbResult<Canvas> {
        Canvas::new(self.width, self.height)
    }
}

#[derive(Debug, Deserialize)]
struct PresetFile {
    default: String,
    presets: Vec<Preset>,
}

#[derive(Clone, Debug)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
    default_index: usize,
}

impl PresetCatalog {
    pub fn builtin() -> ThumbResult<Self> {
        Self::from_json_str(BUILTIN_PRESETS_JSON)
    }

    /// Parse a preset table; every preset must describe a valid canvas.
    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let file: PresetFile = serde_json::from_str(s)
            .map_err(|e| ThumbError::serde(format!("parse preset catalog JSON: {e}")))?;
        for (i, p) in file.presets.iter().enumerate() {
            p.canvas()
                .map_err(|e| ThumbError::validation(format!("preset '{}': {e}", p.id)))?;
            if file.presets[..i].iter().any(|o| o.id == p.id) {
                return Err(ThumbError::validation(format!(
                    "duplicate preset id '{}'",
                    p.id
                )));
            }
        }
        let default_index = file
            .presets
            .iter()
            .position(|p| p.id == file.default)
            .ok_or_else(|| {
                ThumbError::validation(format!(
                    "default preset '{}' is not in the catalog",
                    file.default
                ))
            })?;
        Ok(Self {
            presets: file.presets,
            default_index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn default_preset(&self) -> &Preset {
        &self.presets[self.default_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/presets.rs"]
mod tests;
