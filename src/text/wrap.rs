/// Width measurement for a single line of text, in pixels.
///
/// Drawing surfaces supply this so wrapping agrees with what will actually be drawn.
pub trait TextMeasure {
    /// Advance width of `text` laid out on one line.
    fn measure(&mut self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> f64,
{
    fn measure(&mut self, text: &str) -> f64 {
        self(text)
    }
}

/// Greedy word wrap of `text` into lines no wider than `max_width_px`.
///
/// Words are split on single spaces and re-joined with one space. A word wider than the limit is
/// never broken; it gets a line of its own. Empty input yields no lines.
pub fn wrap_text<M>(text: &str, max_width_px: f64, measure: &mut M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    let mut current = String::new();
    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if measure.measure(&candidate) > max_width_px && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
