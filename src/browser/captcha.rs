//! The anti-bot gate.
//!
//! The storefront fronts brand pages with a challenge interstitial. The
//! reliable path is a human: the browser runs with a visible window and
//! the run blocks until the operator confirms the catalog is showing. An
//! optional best-effort click-through of the known challenge widget can
//! run first.

use std::io::Write;

use crate::app::{LugnutError, Result};
use crate::browser::Session;

/// Block until the operator confirms the challenge is solved.
///
/// Reads a line from stdin on a blocking thread so the browser's event
/// handler keeps running while we wait.
pub async fn wait_for_operator() -> Result<()> {
    tokio::task::spawn_blocking(|| {
        print!("Solve the challenge in the browser window, then press Enter to continue... ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok::<_, std::io::Error>(())
    })
    .await
    .map_err(|e| LugnutError::Browser(format!("Operator prompt task failed: {}", e)))??;

    Ok(())
}

/// Try to click through the known challenge widget inside its iframe.
///
/// Returns true if a checkbox was found and clicked. Cross-origin frames
/// make the iframe document unreadable in most deployments, so a false
/// here is expected and the caller falls back to the operator prompt.
pub async fn try_auto_challenge(session: &Session) -> Result<bool> {
    let script = r#"(() => {
        try {
            const frame = document.querySelector('iframe[src*="challenge"]');
            if (!frame || !frame.contentDocument) return false;
            const mark = frame.contentDocument.querySelector('span.mark');
            if (!mark) return false;
            mark.click();
            return true;
        } catch (e) {
            return false;
        }
    })()"#;

    let clicked = session.eval_json(script).await?.as_bool().unwrap_or(false);
    if clicked {
        tracing::info!("Challenge widget clicked automatically");
    } else {
        tracing::debug!("Challenge widget not reachable, deferring to operator");
    }
    Ok(clicked)
}
