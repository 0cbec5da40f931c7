//! Relative and symbolic length values.
//!
//! Lengths are stored already classified by unit. Parsing is lenient: anything that is not a
//! recognizable number collapses to `0px`, so resolving a length can never fail.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root font size used for `rem` units.
pub const ROOT_FONT_SIZE_PX: f64 = 16.0;

/// A length relative to some reference dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels (bare numbers and `"npx"`).
    Px(f64),
    /// Percentage of the reference dimension (`"p%"`).
    Percent(f64),
    /// Multiple of [`ROOT_FONT_SIZE_PX`] (`"nrem"`).
    Rem(f64),
}

impl Length {
    /// Parse a textual length. Never fails: malformed input yields `Px(0.0)`.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if let Some(p) = t.strip_suffix('%') {
            return Self::Percent(leading_number(p).unwrap_or(0.0));
        }
        if let Some(p) = t.strip_suffix("px") {
            return Self::Px(leading_number(p).unwrap_or(0.0));
        }
        if let Some(p) = t.strip_suffix("rem") {
            return Self::Rem(leading_number(p).unwrap_or(0.0));
        }
        Self::Px(leading_number(t).unwrap_or(0.0))
    }

    /// Resolve to pixels against `reference_px` (canvas width or height).
    ///
    /// Only percentages depend on the reference. Non-finite results resolve to `0`.
    pub fn resolve(self, reference_px: f64) -> f64 {
        let v = match self {
            Self::Px(v) => v,
            Self::Percent(p) => reference_px * (p / 100.0),
            Self::Rem(r) => r * ROOT_FONT_SIZE_PX,
        };
        if v.is_finite() { v } else { 0.0 }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl From<f64> for Length {
    fn from(v: f64) -> Self {
        Self::Px(v)
    }
}

impl From<&str> for Length {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Rem(r) => write!(f, "{r}rem"),
        }
    }
}

/// Resolve a textual length against `reference_px`.
pub fn resolve_length_str(s: &str, reference_px: f64) -> f64 {
    Length::parse(s).resolve(reference_px)
}

/// Longest numeric prefix of `s` (after leading whitespace), like a lenient float parse.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when it has at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Serialize for Length {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Px(v) => serializer.serialize_f64(*v),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
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
            Repr::Num(v) => Ok(Self::Px(v)),
            Repr::Str(s) => Ok(Self::parse(&s)),
        }
    }
}

/// Vertical position of an element: a length, or `"auto"` (stack below the previous element).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalPosition {
    /// Directly below the element recorded last in the current pass, plus a gap.
    Auto,
    /// Explicit position resolved against the canvas height.
    At(Length),
}

impl VerticalPosition {
    /// Return `true` for `"auto"`.
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl Default for VerticalPosition {
    fn default() -> Self {
        Self::At(Length::default())
    }
}

impl From<Length> for VerticalPosition {
    fn from(l: Length) -> Self {
        Self::At(l)
    }
}

impl Serialize for VerticalPosition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::At(l) => l.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for VerticalPosition {
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
            Repr::Num(v) => Ok(Self::At(Length::Px(v))),
            Repr::Str(s) if s.trim().eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Repr::Str(s) => Ok(Self::At(Length::parse(&s))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/units.rs"]
mod tests;
