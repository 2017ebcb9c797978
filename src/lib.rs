//! # keyword-scan
//!
//! Scan PDFs and office documents for monitored keywords, classified as
//! positive or negative, and report every hit with its page, line, and a
//! highlighted snippet of surrounding text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   extract    │──▶│ MatchEngine  │──▶│  ScanReport  │
//! │ PDF/PPTX/... │   │ (core crate) │   │ text / JSON  │
//! └──────────────┘   └──────▲───────┘   └──────┬───────┘
//!                           │                  │
//!                    ┌──────┴───────┐    ┌─────┴─────┐
//!                    │   keywords   │    │ CLI (kws) │
//!                    │   (SQLite)   │    │   HTTP    │
//!                    └──────────────┘    └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kws init
//! kws keyword add approved --category positive
//! kws keyword add fraud --category negative
//! kws scan ./claims/claim-0042.pdf
//! kws serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite keyword store |
//! | [`extract`] | Per-page text extraction |
//! | [`scan`] | Extraction + matching pipeline |
//! | [`render`] | Text and line-view output |
//! | [`keywords`] | `kws keyword` commands |
//! | [`export`] | Keyword import / export |
//! | [`stats`] | Database overview |
//! | [`server`] | HTTP JSON API |

pub mod config;
pub mod db;
pub mod export;
pub mod extract;
pub mod keywords;
pub mod migrate;
pub mod render;
pub mod scan;
pub mod server;
pub mod sqlite_store;
pub mod stats;
