use std::path::PathBuf;

use crate::app::{AppContext, LugnutError, Result};
use crate::browser::{captcha, locator, Session};
use crate::export;
use crate::merge;
use crate::scrape;
use crate::sites::SiteProfile;
use crate::table::Table;

/// Overrides a `scrape` invocation can apply on top of the config.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    pub max_pages: Option<u32>,
    pub pages_from: u32,
    pub headless: bool,
    pub auto_challenge: bool,
}

pub async fn run_scrape(ctx: &AppContext, site_key: &str, opts: ScrapeOptions) -> Result<()> {
    let site = SiteProfile::find(site_key).ok_or_else(|| {
        LugnutError::UnknownSite(format!(
            "{} (valid sites: {})",
            site_key,
            SiteProfile::keys().join(", ")
        ))
    })?;

    let mut browser_settings = ctx.config.browser.clone();
    browser_settings.headless = browser_settings.headless || opts.headless;
    browser_settings.auto_challenge = browser_settings.auto_challenge || opts.auto_challenge;

    let max_pages = opts.max_pages.unwrap_or(ctx.config.scrape.max_pages);

    println!("Scraping {} ({})", site.brand, site.start_url);

    let session = Session::launch(&browser_settings).await?;
    let outcome = scrape_site(&session, &site, ctx, &browser_settings, opts.pages_from, max_pages).await;
    session.close().await;
    let records = outcome?;

    println!("Extracted {} records", records.len());

    let mut table = Table::from_records(&records)?;
    table.reorder(&site.columns);

    let path = export::artifact_path(&ctx.output_dir, site.brand, site.artifact_kind);
    export::write_xlsx(&table, &path, &ctx.config.export)?;

    println!("Artifact written: {}", path.display());
    Ok(())
}

/// The browser-bound part of a scrape run. Split out so the session can
/// be closed on any exit path before the export stage runs.
async fn scrape_site(
    session: &Session,
    site: &SiteProfile,
    ctx: &AppContext,
    browser_settings: &crate::config::BrowserSettings,
    pages_from: u32,
    max_pages: u32,
) -> Result<Vec<crate::table::Record>> {
    let settings = &ctx.config.scrape;

    session.goto(site.start_url).await?;

    if browser_settings.auto_challenge {
        captcha::try_auto_challenge(session).await?;
    }
    if !browser_settings.headless {
        captcha::wait_for_operator().await?;
    }

    if site.needs_group_tab {
        locator::GROUP_SKU_TAB.click_first(session).await?;
        tokio::time::sleep(settings.page_settle()).await;
    }

    let links = scrape::discover_links(session, site, settings, pages_from, max_pages).await?;
    tracing::info!(links = links.len(), "Discovery complete");

    scrape::extract_details(session, site, settings, &links).await
}

pub fn run_merge(ctx: &AppContext, input_dir: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    let output = match output {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.output_dir.join(path),
        None => {
            let date = chrono::Local::now().date_naive().format("%Y-%m-%d");
            ctx.output_dir.join(format!("Merged_{}.xlsx", date))
        }
    };

    merge::merge_dir(input_dir, &output, &ctx.config.export)
}

pub fn list_sites() {
    for site in SiteProfile::all() {
        println!("{:<12} {} ({})", site.key, site.brand, site.artifact_kind);
        println!("             {}", site.start_url);
    }
}
