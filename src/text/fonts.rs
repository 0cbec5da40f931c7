use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ThumbError, ThumbResult};

/// Numeric font weight on the CSS scale (`100..=900`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// `400`.
    pub const NORMAL: Self = Self(400);
    /// `700`.
    pub const BOLD: Self = Self(700);

    /// Parse a keyword (`"bold"`, `"semibold"`, ...) or a number (`"800"`).
    pub fn parse(s: &str) -> ThumbResult<Self> {
        let t = s.trim().to_ascii_lowercase();
        let w = match t.as_str() {
            "thin" | "hairline" => 100,
            "extralight" | "extra-light" | "ultralight" => 200,
            "light" => 300,
            "normal" | "regular" => 400,
            "medium" => 500,
            "semibold" | "semi-bold" | "demibold" => 600,
            "bold" => 700,
            "extrabold" | "extra-bold" | "ultrabold" => 800,
            "black" | "heavy" => 900,
            other => other
                .parse::<u16>()
                .map_err(|_| ThumbError::validation(format!("unknown font weight \"{s}\"")))?,
        };
        Self::from_number(f64::from(w))
    }

    /// Validate a numeric weight.
    pub fn from_number(w: f64) -> ThumbResult<Self> {
        if !w.is_finite() || !(1.0..=1000.0).contains(&w) {
            return Err(ThumbError::validation(format!(
                "font weight {w} must be within 1..=1000"
            )));
        }
        Ok(Self(w.round() as u16))
    }

    /// Weight as `f32`, the form Parley expects.
    pub fn as_f32(self) -> f32 {
        f32::from(self.0)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FontWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(w) => Self::from_number(w).map_err(serde::de::Error::custom),
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Map a layout/content family key to a CSS-style font stack Parley can resolve.
///
/// Known keys get a stack ending in a generic family; anything else is passed through with a
/// `sans-serif` fallback appended.
pub fn resolve_font_family(name: &str) -> String {
    let key = name.trim();
    let stack = match key.to_ascii_lowercase().as_str() {
        "" | "sans" | "sans-serif" | "default" => "Inter, Roboto, \"Helvetica Neue\", Arial, sans-serif",
        "serif" => "\"Playfair Display\", Georgia, \"Times New Roman\", serif",
        "mono" | "monospace" => "\"JetBrains Mono\", \"Fira Code\", Menlo, monospace",
        "display" => "Montserrat, Poppins, \"Arial Black\", sans-serif",
        "condensed" => "Oswald, \"Roboto Condensed\", \"Arial Narrow\", sans-serif",
        "rounded" => "Nunito, Quicksand, \"Arial Rounded MT Bold\", sans-serif",
        _ => return format!("{key}, sans-serif"),
    };
    stack.to_owned()
}

/// Collect `.ttf` / `.otf` / `.ttc` files from a directory (non-recursive, sorted).
pub fn font_files_in_dir(dir: &Path) -> ThumbResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read font dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read font dir entry in '{}'", dir.display()))?
            .path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if is_font && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
