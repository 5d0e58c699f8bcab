//! Listing traversal: walk the paginated listing and collect product links.

use std::collections::HashSet;

use url::Url;

use crate::app::Result;
use crate::browser::Session;
use crate::config::ScrapeSettings;
use crate::retry::retry;
use crate::sites::{Pagination, SiteProfile};

const LISTING_CONTAINER: &str = "div#SKU-description-container";
const PAGINATION_STRIP: &str = "div#pagination";

/// Walk the listing pages and return product-detail URLs.
///
/// Links are deduplicated in first-seen order across all pages. A page
/// that fails to yield links ends the walk with whatever was collected so
/// far rather than aborting the run; the operator can re-run from a later
/// page with `--pages-from`.
pub async fn discover_links(
    session: &Session,
    site: &SiteProfile,
    settings: &ScrapeSettings,
    start_page: u32,
    max_pages: u32,
) -> Result<Vec<String>> {
    let mut links: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page = start_page.max(1);

    if let Pagination::UrlParam { template } = &site.pagination {
        if page > 1 {
            session.goto(&template.replace("{page}", &page.to_string())).await?;
        }
    }

    loop {
        tracing::info!(page, "Reading listing page");

        let hrefs = match read_listing_page(session, site, settings).await {
            Ok(hrefs) => hrefs,
            Err(e) => {
                tracing::warn!(page, "Listing page failed, stopping discovery: {}", e);
                break;
            }
        };

        let before = links.len();
        merge_links(&mut links, &mut seen, hrefs);
        tracing::info!(
            page,
            new = links.len() - before,
            total = links.len(),
            "Collected product links"
        );

        if page >= max_pages {
            tracing::info!(max_pages, "Page ceiling reached");
            break;
        }

        if !advance(session, site, settings, page + 1).await? {
            break;
        }
        page += 1;
    }

    Ok(links)
}

/// Read the product anchors off the current listing page.
///
/// The container is waited for, then the hrefs are collected in one script
/// pass. Ajax swaps can replace the container mid-read, so the whole read
/// is retried a bounded number of times.
async fn read_listing_page(
    session: &Session,
    site: &SiteProfile,
    settings: &ScrapeSettings,
) -> Result<Vec<String>> {
    session
        .wait_for(LISTING_CONTAINER, settings.element_wait(), settings.poll_interval())
        .await?;

    let script = format!(
        r#"(() => {{
            const anchors = document.querySelectorAll('div#product-details a');
            const prefix = {};
            const out = [];
            for (const a of anchors) {{
                const href = a.getAttribute('href') || '';
                if (href.startsWith(prefix)) out.push(href);
            }}
            return out;
        }})()"#,
        serde_json::to_string(site.link_prefix)?
    );

    let base = session
        .current_url()
        .await
        .unwrap_or_else(|| site.start_url.to_string());

    retry(settings.stale_retries, settings.poll_interval(), || async {
        let value = session.eval_json(&script).await?;
        let hrefs: Vec<String> = value
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();
        absolutize(&base, hrefs)
    })
    .await
}

/// Resolve relative hrefs against the page URL.
fn absolutize(base: &str, hrefs: Vec<String>) -> Result<Vec<String>> {
    let base = Url::parse(base)?;
    let mut out = Vec::with_capacity(hrefs.len());
    for href in hrefs {
        out.push(base.join(&href)?.to_string());
    }
    Ok(out)
}

/// Append hrefs not seen before, preserving first-seen order.
fn merge_links(links: &mut Vec<String>, seen: &mut HashSet<String>, hrefs: Vec<String>) {
    for href in hrefs {
        if seen.insert(href.clone()) {
            links.push(href);
        }
    }
}

/// Move to the next listing page. Returns false when there is none.
async fn advance(
    session: &Session,
    site: &SiteProfile,
    settings: &ScrapeSettings,
    next_page: u32,
) -> Result<bool> {
    match &site.pagination {
        Pagination::ClickNext => {
            let selector = format!(
                r#"{} a[href*="pageNumber={}"]"#,
                PAGINATION_STRIP, next_page
            );
            if !session.exists(&selector).await? {
                tracing::info!("No further listing pages");
                return Ok(false);
            }
            if !session.click(&selector).await? {
                tracing::warn!(next_page, "Next-page anchor vanished before click");
                return Ok(false);
            }
            tokio::time::sleep(settings.page_settle()).await;
            Ok(true)
        }
        Pagination::UrlParam { template } => {
            let selector = format!(
                r#"{} a[href*="pageNumber={}"]"#,
                PAGINATION_STRIP, next_page
            );
            if !session.exists(&selector).await? {
                tracing::info!("No further listing pages");
                return Ok(false);
            }
            let url = template.replace("{page}", &next_page.to_string());
            session.goto(&url).await?;
            tokio::time::sleep(settings.page_settle()).await;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_links_dedups_in_first_seen_order() {
        let mut links = Vec::new();
        let mut seen = HashSet::new();

        merge_links(
            &mut links,
            &mut seen,
            vec!["a".to_string(), "b".to_string()],
        );
        merge_links(
            &mut links,
            &mut seen,
            vec!["b".to_string(), "c".to_string(), "a".to_string()],
        );

        assert_eq!(links, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_absolutize_relative_hrefs() {
        let out = absolutize(
            "https://www.jegs.com/v/Backrack/181?Tab=GROUP",
            vec!["/i/Backrack/181/147/10002".to_string()],
        )
        .unwrap();
        assert_eq!(out, vec!["https://www.jegs.com/i/Backrack/181/147/10002"]);
    }

    #[test]
    fn test_absolutize_keeps_absolute_hrefs() {
        let out = absolutize(
            "https://www.jegs.com/v/Backrack/181",
            vec!["https://www.jegs.com/i/Backrack/181/147/10002".to_string()],
        )
        .unwrap();
        assert_eq!(out, vec!["https://www.jegs.com/i/Backrack/181/147/10002"]);
    }
}
