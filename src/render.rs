//! Human-readable output for scan reports.

use std::fmt::Write;

use anyhow::{anyhow, Result};
use keyword_scan_core::highlight::{highlight, highlight_snippet, Markup};
use keyword_scan_core::models::Category;

use crate::scan::ScanReport;

/// Map a configured markup name to a [`Markup`]. `auto` picks ANSI when
/// stdout is a terminal.
pub fn resolve_markup(name: &str) -> Result<Markup> {
    if name == "auto" {
        return Ok(if atty::is(atty::Stream::Stdout) {
            Markup::Ansi
        } else {
            Markup::Plain
        });
    }
    name.parse::<Markup>().map_err(|e| anyhow!(e))
}

/// One block per match followed by the summary counts.
pub fn render_text(report: &ScanReport, markup: Markup) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} of {} pages scanned, {})",
        highlight(&report.document, &[], markup),
        report.pages_scanned,
        report.page_count,
        report.mode
    );
    if report.stopped_early {
        let _ = writeln!(out, "Stopped early; remaining pages were not searched.");
    }
    out.push('\n');

    if report.matches.is_empty() {
        out.push_str("No matches.\n");
        return out;
    }

    let mut page = 0;
    let mut page_matches = Vec::new();
    for m in &report.matches {
        if m.page != page {
            page = m.page;
            page_matches = report.page_matches(page);
        }
        let _ = writeln!(
            out,
            "page {}, line {} [{}] {}",
            m.page,
            m.line,
            m.keyword.category(),
            highlight(m.keyword.text(), &[], markup)
        );
        let _ = writeln!(out, "    {}", highlight_snippet(m, &page_matches, markup));
    }

    out.push('\n');
    let counts = &report.summary.counts_by_category;
    let _ = writeln!(
        out,
        "Summary: {} positive, {} negative",
        counts.positive, counts.negative
    );
    let width = report
        .summary
        .counts_by_keyword
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0);
    for (keyword, count) in &report.summary.counts_by_keyword {
        let pad = width - keyword.chars().count();
        let _ = writeln!(
            out,
            "  {}{:pad$}  {}",
            highlight(keyword, &[], markup),
            "",
            count,
            pad = pad
        );
    }
    out
}

/// Matches grouped by (page, line): every keyword hit on a line, listed once.
pub fn render_lines(report: &ScanReport) -> String {
    let mut out = String::new();
    if report.matches.is_empty() {
        out.push_str("No matches.\n");
        return out;
    }

    let mut lines: Vec<(u32, usize, Vec<(&str, Category)>)> = Vec::new();
    for m in &report.matches {
        let entry = (m.keyword.text(), m.keyword.category());
        match lines
            .iter_mut()
            .find(|(p, l, _)| *p == m.page && *l == m.line)
        {
            Some((_, _, hits)) => {
                if !hits.contains(&entry) {
                    hits.push(entry);
                }
            }
            None => lines.push((m.page, m.line, vec![entry])),
        }
    }
    lines.sort_by_key(|(p, l, _)| (*p, *l));

    for (page, line, hits) in lines {
        let listed: Vec<String> = hits
            .iter()
            .map(|(text, category)| format!("{} ({})", text, category))
            .collect();
        let _ = writeln!(out, "page {}, line {}: {}", page, line, listed.join(", "));
    }
    out
}
