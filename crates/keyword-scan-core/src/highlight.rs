//! Highlight markup for snippets and page text.
//!
//! Markup is applied from byte spans, never by searching and replacing
//! keyword text. Spans are sorted and merged first, so a keyword that is a
//! substring of another (`fraud` inside `frauds`) is wrapped once rather
//! than nested.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::models::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    /// No markers.
    #[default]
    Plain,
    /// `**span**`
    Markdown,
    /// `<mark>span</mark>`, with the surrounding text HTML-escaped.
    Html,
    /// Bold yellow terminal escape codes.
    Ansi,
}

impl Markup {
    fn open(&self) -> &'static str {
        match self {
            Markup::Plain => "",
            Markup::Markdown => "**",
            Markup::Html => "<mark>",
            Markup::Ansi => "\x1b[1;33m",
        }
    }

    fn close(&self) -> &'static str {
        match self {
            Markup::Plain => "",
            Markup::Markdown => "**",
            Markup::Html => "</mark>",
            Markup::Ansi => "\x1b[0m",
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Markup::Plain => "plain",
            Markup::Markdown => "markdown",
            Markup::Html => "html",
            Markup::Ansi => "ansi",
        };
        f.write_str(name)
    }
}

impl FromStr for Markup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "none" => Ok(Markup::Plain),
            "markdown" | "md" => Ok(Markup::Markdown),
            "html" => Ok(Markup::Html),
            "ansi" => Ok(Markup::Ansi),
            other => Err(format!(
                "unknown markup: {}. Use plain, markdown, html, or ansi.",
                other
            )),
        }
    }
}

/// Sort spans and merge any that overlap or touch. Empty spans are dropped.
pub fn merge_spans(spans: impl IntoIterator<Item = Range<usize>>) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = spans.into_iter().filter(|s| s.start < s.end).collect();
    spans.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Wrap every span of `text` in the markup's markers.
///
/// Spans outside the text or not on char boundaries are ignored.
pub fn highlight(text: &str, spans: &[Range<usize>], markup: Markup) -> String {
    let spans = merge_spans(spans.iter().cloned().filter(|s| {
        s.end <= text.len() && text.is_char_boundary(s.start) && text.is_char_boundary(s.end)
    }));

    let mut out = String::with_capacity(text.len() + spans.len() * 16);
    let mut cursor = 0;
    for span in spans {
        push_text(&mut out, &text[cursor..span.start], markup);
        out.push_str(markup.open());
        push_text(&mut out, &text[span.clone()], markup);
        out.push_str(markup.close());
        cursor = span.end;
    }
    push_text(&mut out, &text[cursor..], markup);
    out
}

/// Spans, relative to `m.snippet`, of every match in `page_matches` that
/// falls inside the snippet's window. Always includes `m` itself.
pub fn snippet_spans(m: &Match, page_matches: &[Match]) -> Vec<Range<usize>> {
    let window = &m.context;
    let mut spans = vec![m.snippet_highlight()];
    for other in page_matches.iter().filter(|o| o.page == m.page) {
        let span = other.span();
        let start = span.start.max(window.start);
        let end = span.end.min(window.end);
        if start < end {
            spans.push(start - window.start..end - window.start);
        }
    }
    merge_spans(spans)
}

/// The match's snippet with its own span and any co-located matches marked.
pub fn highlight_snippet(m: &Match, page_matches: &[Match], markup: Markup) -> String {
    highlight(&m.snippet, &snippet_spans(m, page_matches), markup)
}

fn push_text(out: &mut String, text: &str, markup: Markup) {
    if markup != Markup::Html {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
