use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Size};
use crate::foundation::error::ThumbError;

/// Horizontal component of an [`Anchor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HAnchor {
    /// Position names the left edge.
    #[default]
    Left,
    /// Position names the horizontal center.
    Center,
    /// Position names the right edge.
    Right,
}

/// Vertical component of an [`Anchor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VAnchor {
    /// Position names the top edge.
    #[default]
    Top,
    /// Position names the vertical center.
    Center,
    /// Position names the bottom edge.
    Bottom,
}

/// Which point of an element's box its position refers to.
///
/// String forms are dash-joined tokens such as `"top-left"`, `"bottom-center"`, `"center-right"`
/// or plain `"center"`. A `center` token fills whichever axis the other tokens leave unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Horizontal component.
    pub h: HAnchor,
    /// Vertical component.
    pub v: VAnchor,
}

impl Anchor {
    /// The default anchor.
    pub const TOP_LEFT: Self = Self::new(HAnchor::Left, VAnchor::Top);
    /// Box center on both axes.
    pub const CENTER: Self = Self::new(HAnchor::Center, VAnchor::Center);
    /// Bottom-right corner.
    pub const BOTTOM_RIGHT: Self = Self::new(HAnchor::Right, VAnchor::Bottom);

    /// Build from components.
    pub const fn new(h: HAnchor, v: VAnchor) -> Self {
        Self { h, v }
    }

    /// Offset from the anchor point to the box's top-left corner for a box of `size`.
    pub fn offset(self, size: Size) -> (f64, f64) {
        let dx = match self.h {
            HAnchor::Left => 0.0,
            HAnchor::Center => -size.width / 2.0,
            HAnchor::Right => -size.width,
        };
        let dy = match self.v {
            VAnchor::Top => 0.0,
            VAnchor::Center => -size.height / 2.0,
            VAnchor::Bottom => -size.height,
        };
        (dx, dy)
    }

    /// Top-left draw origin for a box of `size` whose anchor sits at `at`.
    pub fn apply(self, at: Point, size: Size) -> Point {
        let (dx, dy) = self.offset(size);
        Point::new(at.x + dx, at.y + dy)
    }
}

impl FromStr for Anchor {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut h = None;
        let mut v = None;
        let mut centered = false;

        for token in s.trim().split('-') {
            match token.trim().to_ascii_lowercase().as_str() {
                "left" => h = Some(HAnchor::Left),
                "right" => h = Some(HAnchor::Right),
                "top" => v = Some(VAnchor::Top),
                "bottom" => v = Some(VAnchor::Bottom),
                "center" | "middle" => centered = true,
                other => {
                    return Err(ThumbError::validation(format!(
                        "unknown anchor token \"{other}\" in \"{s}\""
                    )));
                }
            }
        }

        let h = h.unwrap_or(if centered {
            HAnchor::Center
        } else {
            HAnchor::Left
        });
        let v = v.unwrap_or(if centered { VAnchor::Center } else { VAnchor::Top });
        Ok(Self { h, v })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.v {
            VAnchor::Top => "top",
            VAnchor::Center => "center",
            VAnchor::Bottom => "bottom",
        };
        let h = match self.h {
            HAnchor::Left => "left",
            HAnchor::Center => "center",
            HAnchor::Right => "right",
        };
        if self.h == HAnchor::Center && self.v == VAnchor::Center {
            f.write_str("center")
        } else {
            write!(f, "{v}-{h}")
        }
    }
}

impl Serialize for Anchor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/anchor.rs"]
mod tests;
