//! # Lugnut
//!
//! A browser-driven catalog scraper for automotive-parts storefronts.
//!
//! ## Architecture
//!
//! Lugnut follows a sequential pipeline architecture:
//!
//! ```text
//! Session → Discovery → Extraction → Table → Artifact
//! ```
//!
//! - [`browser`]: Chrome session bootstrap and DOM access via chromiumoxide
//! - [`scrape`]: paginated link discovery and per-product detail extraction
//! - [`table`]: sparse records coerced into a rectangular table
//! - [`export`]: formatted `.xlsx` artifact writing
//! - [`merge`]: combines previously exported artifacts into one file
//!
//! ## Quick Start
//!
//! ```bash
//! # List the built-in site profiles
//! lugnut sites
//!
//! # Scrape one brand catalog (a browser window opens; solve the
//! # anti-bot challenge, then press Enter)
//! lugnut scrape king-shocks
//!
//! # Merge a folder of exported spreadsheets
//! lugnut merge ~/Desktop/scraped --output Combined.xlsx
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct carries the loaded
/// configuration and the resolved artifact output directory.
pub mod app;

/// Chrome session management.
///
/// - [`Session`](browser::Session): launches and drives a single browser
/// - [`LocatorChain`](browser::LocatorChain): ordered selector fallback chains
/// - operator gate for manual anti-bot challenge resolution
pub mod browser;

/// Command-line interface using clap.
///
/// - `sites` - list the built-in site profiles
/// - `scrape <site>` - run the full pipeline for one brand catalog
/// - `merge <dir>` - combine exported spreadsheets
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/lugnut/config.toml`; a commented default file is
/// created on first run.
pub mod config;

/// Formatted `.xlsx` artifact writing.
pub mod export;

/// Spreadsheet merge utility.
pub mod merge;

/// Bounded-attempts retry, shared by every polling site.
pub mod retry;

/// Per-site profiles: URL, selectors, pagination style, extraction mode
/// and column plan for each supported brand catalog.
pub mod sites;

/// Link discovery and detail extraction.
///
/// - [`discover_links`](scrape::discover_links): paginated listing walk
/// - [`extract_details`](scrape::extract_details): per-product field scraping
pub mod scrape;

/// Records and tables.
///
/// - [`Record`](table::Record): ordered field-name → text mapping
/// - [`Table`](table::Table): rectangular form with unioned columns
/// - [`ColumnPlan`](table::ColumnPlan): preferred-prefix column ordering
pub mod table;
