//! Ordered selector fallbacks.
//!
//! The storefront renders the same control with slightly different markup
//! across templates, so interaction points are addressed by a chain of
//! CSS selectors tried in order rather than a single locator.

use crate::app::{LugnutError, Result};
use crate::browser::Session;

/// A named list of CSS selectors tried first to last.
#[derive(Debug, Clone)]
pub struct LocatorChain {
    /// What the chain points at, used in logs and errors.
    pub target: &'static str,
    pub selectors: &'static [&'static str],
}

/// The SKU-listing tab on a brand group page. The preferred selector pins
/// the tab by its query string; the fallback takes whichever tab is
/// currently unselected.
pub const GROUP_SKU_TAB: LocatorChain = LocatorChain {
    target: "group SKU tab",
    selectors: &[
        r#"span#unselected-tab a[href*="?Tab=SKU"]"#,
        "span#unselected-tab a",
    ],
};

impl LocatorChain {
    /// Click the first selector that matches on the page.
    ///
    /// Misses along the chain are logged at debug level; an exhausted
    /// chain is an [`LugnutError::ElementNotFound`].
    pub async fn click_first(&self, session: &Session) -> Result<&'static str> {
        for selector in self.selectors {
            if session.click(selector).await? {
                tracing::debug!(target = self.target, selector, "Clicked");
                return Ok(selector);
            }
            tracing::debug!(target = self.target, selector, "Selector missed, trying next");
        }
        Err(LugnutError::ElementNotFound(format!(
            "No selector matched for {}: tried {:?}",
            self.target, self.selectors
        )))
    }

    /// First selector in the chain that currently matches, if any.
    pub async fn find(&self, session: &Session) -> Result<Option<&'static str>> {
        for selector in self.selectors {
            if session.exists(selector).await? {
                return Ok(Some(selector));
            }
        }
        Ok(None)
    }
}
