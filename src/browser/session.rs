//! Browser session lifecycle and page-level helpers.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use rand::seq::SliceRandom;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use crate::app::{LugnutError, Result};
use crate::config::BrowserSettings;
use crate::retry::poll_until;

/// One live Chrome session: the browser process, its event handler task,
/// a single page, and the throwaway profile directory.
///
/// The profile directory is a fresh [`TempDir`] per session so no cookies
/// or cache survive between runs; it is removed when the session drops.
pub struct Session {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    _profile_dir: TempDir,
    page_load_timeout: Duration,
}

impl Session {
    /// Launch Chrome and open a blank page.
    ///
    /// The window is visible unless `headless` is set; the operator needs
    /// to see the page to get past the storefront's challenge interstitial.
    /// A user agent is picked at random from the configured pool.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let profile_dir = TempDir::new()?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir.path())
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--ignore-certificate-errors")
            .arg("--start-maximized");

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| LugnutError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            LugnutError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // The handler stream must be drained for the session to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| LugnutError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ua) = settings.user_agents.choose(&mut rand::thread_rng()) {
            page.set_user_agent(ua.as_str())
                .await
                .map_err(|e| LugnutError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Self {
            browser,
            page,
            handler_task,
            _profile_dir: profile_dir,
            page_load_timeout: settings.page_load_timeout(),
        })
    }

    /// Navigate the page and wait for the load to finish, bounded by the
    /// configured page load timeout.
    pub async fn goto(&self, url: &str) -> Result<()> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| LugnutError::Navigation(format!("Failed to open {}: {}", url, e)))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| LugnutError::Navigation(format!("Load failed for {}: {}", url, e)))?;
            Ok(())
        };

        match tokio::time::timeout(self.page_load_timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(LugnutError::Navigation(format!(
                "Timed out loading {} after {:?}",
                url, self.page_load_timeout
            ))),
        }
    }

    /// The page's current URL, if the browser reports one.
    pub async fn current_url(&self) -> Option<String> {
        self.page.url().await.ok().flatten()
    }

    /// Evaluate a script on the page and return its JSON result.
    pub async fn eval_json(&self, script: &str) -> Result<serde_json::Value> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| LugnutError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| LugnutError::Browser(format!("Failed to parse script result: {:?}", e)))
    }

    /// True if at least one element matches the selector right now.
    pub async fn exists(&self, css: &str) -> Result<bool> {
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(css)?
        );
        Ok(self.eval_json(&script).await?.as_bool().unwrap_or(false))
    }

    /// Inner text of the first match, or `None` when the selector misses.
    pub async fn text_of(&self, css: &str) -> Result<Option<String>> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({});
                return el ? el.innerText : null;
            }})()"#,
            serde_json::to_string(css)?
        );
        Ok(self
            .eval_json(&script)
            .await?
            .as_str()
            .map(|s| s.to_string()))
    }

    /// Click the first match via JavaScript. Returns false when the
    /// selector misses; ajax-swapped anchors stay clickable this way where
    /// a cached node handle would have gone stale.
    pub async fn click(&self, css: &str) -> Result<bool> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.click();
                return true;
            }})()"#,
            serde_json::to_string(css)?
        );
        Ok(self.eval_json(&script).await?.as_bool().unwrap_or(false))
    }

    /// True if the page body currently contains the given text.
    pub async fn page_contains(&self, needle: &str) -> Result<bool> {
        let script = format!(
            "document.body && document.body.innerText.includes({})",
            serde_json::to_string(needle)?
        );
        Ok(self.eval_json(&script).await?.as_bool().unwrap_or(false))
    }

    /// Poll for a selector until it appears or the timeout elapses.
    pub async fn wait_for(&self, css: &str, timeout: Duration, interval: Duration) -> Result<()> {
        let appeared = poll_until(timeout, interval, || self.exists(css)).await;
        if appeared {
            Ok(())
        } else {
            Err(LugnutError::ElementNotFound(format!(
                "{} did not appear within {:?}",
                css, timeout
            )))
        }
    }

    /// Close the page and the browser process.
    ///
    /// Failures are logged and swallowed; the temp profile is removed on
    /// drop either way, and no other Chrome processes are touched.
    pub async fn close(mut self) {
        if let Err(e) = self.page.close().await {
            tracing::debug!("Page close failed: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Browser did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
    }
}
