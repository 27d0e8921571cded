//! Greedy word-wrap against a pixel-width budget.
//!
//! A pure function of (text, budget, glyph metrics): rendering never feeds
//! back into layout, so this is fuzzable in isolation.

/// Glyph-run measuring collaborator. Implementations wrap whatever font
/// stack the host renders with.
pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn width(&self, text: &str) -> f32;
}

/// Fixed-advance metrics for tests and terminal front ends.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance: f32,
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}

/// Wrap `text` into at most `max_lines` lines whose rendered width stays
/// within `budget`.
///
/// Words accumulate greedily, each measured with a trailing space. A word
/// that alone exceeds the budget is hard-split character by character into
/// budget-fitting fragments; this is the only place sub-word splitting
/// happens. Lines beyond `max_lines` are silently dropped.
pub fn wrap(
    text: &str,
    budget: f32,
    max_lines: usize,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_width = 0.0f32;

    for word in text.split_whitespace() {
        let word_width = measure.width(&format!("{word} "));

        if word_width > budget {
            if !current.is_empty() {
                lines.push(current.join(" "));
                current.clear();
                current_width = 0.0;
            }
            let mut part = String::new();
            for ch in word.chars() {
                let mut test = part.clone();
                test.push(ch);
                if measure.width(&format!("{test} ")) <= budget {
                    part = test;
                } else {
                    if !part.is_empty() {
                        lines.push(part.clone());
                    }
                    part.clear();
                    part.push(ch);
                }
            }
            if !part.is_empty() {
                current_width = measure.width(&format!("{part} "));
                current.push(part);
            }
        } else if current_width + word_width <= budget {
            current_width += word_width;
            current.push(word.to_string());
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word.to_string()];
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines.truncate(max_lines);
    lines
}
