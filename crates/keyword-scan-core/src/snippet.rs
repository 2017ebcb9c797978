//! Snippet construction around a match.
//!
//! The context window is measured in characters, not bytes, so the slice
//! always lands on UTF-8 boundaries. Newlines inside the window become
//! spaces and surrounding whitespace is trimmed; both steps keep byte
//! positions stable, so [`Snippet::context`] maps the snippet back onto the
//! page text exactly.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    /// Page byte range that `text` was cut from.
    pub context: Range<usize>,
}

/// Cut `radius` characters of context on each side of `text[offset..offset + len]`.
///
/// `offset` and `offset + len` must be char boundaries of `text`.
pub fn build_snippet(text: &str, offset: usize, len: usize, radius: usize) -> Snippet {
    debug_assert!(text.is_char_boundary(offset));
    let match_end = (offset + len).min(text.len());

    let start = if radius == 0 {
        offset
    } else {
        text[..offset]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let end = text[match_end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| match_end + i)
        .unwrap_or(text.len());

    let cleaned: String = text[start..end]
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let lead = (cleaned.len() - cleaned.trim_start().len()).min(offset - start);
    let trail = (cleaned.len() - cleaned.trim_end().len()).min(end - match_end);
    let body = &cleaned[lead..cleaned.len() - trail];

    Snippet {
        text: body.to_string(),
        context: start + lead..end - trail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clamped_at_text_edges() {
        let s = build_snippet("fraud here", 0, 5, 30);
        assert_eq!(s.text, "fraud here");
        assert_eq!(s.context, 0..10);
    }

    #[test]
    fn newlines_collapsed_and_trimmed() {
        let text = "Line one.\nThe claim was Approved by staff.\nAnother line.";
        let offset = text.find("Approved").unwrap();
        let s = build_snippet(text, offset, 8, 10);
        assert_eq!(s.text, "claim was Approved by staff.");
        assert_eq!(&text[s.context.clone()], "claim was Approved by staff.");

        let wide = build_snippet(text, offset, 8, 20);
        assert!(wide.text.starts_with("one. The claim"));
        assert!(!wide.text.contains('\n'));
    }

    #[test]
    fn zero_radius_is_just_the_match() {
        let s = build_snippet("abc fraud xyz", 4, 5, 0);
        assert_eq!(s.text, "fraud");
        assert_eq!(s.context, 4..9);
    }

    #[test]
    fn radius_counts_characters_not_bytes() {
        let text = "ééé fraud ééé";
        let offset = text.find("fraud").unwrap();
        let s = build_snippet(text, offset, 5, 2);
        assert_eq!(s.text, "é fraud é");
        assert!(s.text.chars().count() <= 2 * 2 + 5);
    }
}
