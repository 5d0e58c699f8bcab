pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lugnut")]
#[command(about = "Catalog scraper for automotive parts listings", long_about = None)]
pub struct Cli {
    /// Append logs to this file in addition to the console
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Override the artifact output directory
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the supported sites
    Sites,
    /// Scrape a site and write its artifact
    Scrape {
        /// Site key (see `sites`)
        site: String,

        /// Listing page ceiling, overriding the config
        #[arg(long)]
        max_pages: Option<u32>,

        /// Resume discovery from this listing page
        #[arg(long, default_value_t = 1)]
        pages_from: u32,

        /// Run the browser without a window (the challenge gate then
        /// relies on --auto-challenge succeeding)
        #[arg(long)]
        headless: bool,

        /// Try the automatic challenge click-through before prompting
        #[arg(long)]
        auto_challenge: bool,
    },
    /// Merge a directory of .xlsx artifacts into one workbook
    Merge {
        /// Directory containing the .xlsx files
        input_dir: PathBuf,

        /// Output file name (default: Merged_<YYYY-MM-DD>.xlsx)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
