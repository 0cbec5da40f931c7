use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::error::{ThumbError, ThumbResult};

const BUILTIN_GRADIENTS_JSON: &str = include_str!("builtin_gradients.json");

/// Named two-stop background gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Color at the top-left corner.
    pub from: Color,
    /// Color at the bottom-right corner.
    pub to: Color,
}

#[derive(Debug, Deserialize)]
struct GradientFile {
    default: String,
    gradients: Vec<GradientDef>,
}

/// Read-only gradient table with a designated default.
#[derive(Clone, Debug)]
pub struct GradientCatalog {
    gradients: Vec<GradientDef>,
    default_index: usize,
}

impl GradientCatalog {
    pub fn builtin() -> ThumbResult<Self> {
        Self::from_json_str(BUILTIN_GRADIENTS_JSON)
    }

    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let file: GradientFile = serde_json::from_str(s)
            .map_err(|e| ThumbError::serde(format!("parse gradient catalog JSON: {e}")))?;
        for (i, g) in file.gradients.iter().enumerate() {
            if g.id.is_empty() {
                return Err(ThumbError::validation("gradient id must be non-empty"));
            }
            if file.gradients[..i].iter().any(|o| o.id == g.id) {
                return Err(ThumbError::validation(format!(
                    "duplicate gradient id '{}'",
                    g.id
                )));
            }
        }
        let default_index = file
            .gradients
            .iter()
            .position(|g| g.id == file.default)
            .ok_or_else(|| {
                ThumbError::validation(format!(
                    "default gradient '{}' is not in the catalog",
                    file.default
                ))
            })?;
        Ok(Self {
            gradients: file.gradients,
            default_index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&GradientDef> {
        self.gradients.iter().find(|g| g.id == id)
    }

    pub fn default_gradient(&self) -> &GradientDef {
        &self.gradients[self.default_index]
    }

    /// Unknown or missing ids fall back to the default gradient.
    pub fn get_or_default(&self, id: Option<&str>) -> &GradientDef {
        match id {
            Some(id) => self.get(id).unwrap_or_else(|| {
                tracing::debug!(gradient = id, "unknown gradient id, using default");
                self.default_gradient()
            }),
            None => self.default_gradient(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GradientDef> {
        self.gradients.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/gradients.rs"]
mod tests;
