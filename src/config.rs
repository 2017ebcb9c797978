//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/keywords.sqlite"
//!
//! [scan]
//! mode = "first-per-line"     # or "all-occurrences"
//! context_radius = 40
//! max_pages = 500             # optional
//! max_file_bytes = 52428800
//!
//! [render]
//! markup = "auto"             # auto, plain, ansi, markdown, html
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```
//!
//! Only `[db]` is required; every other section has defaults.

use anyhow::{Context, Result};
use keyword_scan_core::engine::{SearchOptions, DEFAULT_CONTEXT_RADIUS};
use keyword_scan_core::models::SearchMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
    #[serde(default)]
    pub max_pages: Option<usize>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            max_pages: None,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl ScanConfig {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            mode: self.mode,
            context_radius: self.context_radius,
            max_pages: self.max_pages,
        }
    }
}

fn default_context_radius() -> usize {
    DEFAULT_CONTEXT_RADIUS
}
fn default_max_file_bytes() -> u64 {
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_markup")]
    pub markup: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            markup: default_markup(),
        }
    }
}

fn default_markup() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults for everything, with the database at `db_path`.
    pub fn minimal(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbConfig {
                path: db_path.into(),
            },
            scan: ScanConfig::default(),
            render: RenderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    if config.scan.max_file_bytes == 0 {
        anyhow::bail!("scan.max_file_bytes must be > 0");
    }

    if config.scan.max_pages == Some(0) {
        anyhow::bail!("scan.max_pages must be >= 1 when set");
    }

    match config.render.markup.as_str() {
        "auto" | "plain" | "ansi" | "markdown" | "html" => {}
        other => anyhow::bail!(
            "Unknown render.markup: '{}'. Must be auto, plain, ansi, markdown, or html.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_uses_defaults() {
        let cfg = parse_config("[db]\npath = \"./data/kw.sqlite\"\n").unwrap();
        assert_eq!(cfg.scan.mode, SearchMode::FirstPerLine);
        assert_eq!(cfg.scan.context_radius, DEFAULT_CONTEXT_RADIUS);
        assert_eq!(cfg.scan.max_pages, None);
        assert_eq!(cfg.render.markup, "auto");
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
    }

    #[test]
    fn scan_section_parsed() {
        let cfg = parse_config(
            r#"
[db]
path = "kw.sqlite"

[scan]
mode = "all-occurrences"
context_radius = 12
max_pages = 3
"#,
        )
        .unwrap();
        let opts = cfg.scan.search_options();
        assert_eq!(opts.mode, SearchMode::AllOccurrences);
        assert_eq!(opts.context_radius, 12);
        assert_eq!(opts.max_pages, Some(3));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_config("[db]\npath = \"\"\n").is_err());
        assert!(parse_config("[db]\npath = \"a\"\n[scan]\nmode = \"fuzzy\"\n").is_err());
        assert!(parse_config("[db]\npath = \"a\"\n[scan]\nmax_pages = 0\n").is_err());
        assert!(parse_config("[db]\npath = \"a\"\n[render]\nmarkup = \"rtf\"\n").is_err());
        assert!(parse_config("[scan]\ncontext_radius = 5\n").is_err());
    }
}
