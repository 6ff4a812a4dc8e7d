//! `Interact` over a live WebDriver session.

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, Locator};
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use super::controller::Interact;
use crate::error::{Result, ScrapeError, UiFailure};
use crate::selectors::{PANEL_BODY_CSS, PANEL_CLOSE_CSS};

/// Interval of every bounded poll against the page.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// WebDriver key code for Escape.
const ESCAPE_KEY: &str = "\u{e00c}";

const CENTER_SCRIPT: &str = r#"
const rect = arguments[0].getBoundingClientRect();
const top = rect.top + window.pageYOffset;
const middle = top - (window.innerHeight / 2) + (rect.height / 2);
window.scrollTo(0, middle - arguments[1]);
"#;

const POINTER_CLICK_SCRIPT: &str = r#"
const el = arguments[0];
const rect = el.getBoundingClientRect();
const opts = {
  bubbles: true,
  cancelable: true,
  view: window,
  clientX: rect.left + rect.width / 2,
  clientY: rect.top + rect.height / 2,
};
for (const type of ["mouseover", "mousemove", "mousedown", "mouseup", "click"]) {
  el.dispatchEvent(new MouseEvent(type, opts));
}
"#;

/// Run `check` every `POLL_INTERVAL` until it yields a value or `timeout`
/// has passed. `check` runs at least once.
pub async fn poll_until<T, F, Fut>(timeout: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(v) = check().await {
            return Some(v);
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[derive(Debug, Clone)]
pub struct WebDriver {
    client: Client,
}

impl WebDriver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn run_on(&self, script: &str, target: &Element, extra: Vec<Value>) -> Result<Value> {
        let mut args = vec![serde_json::to_value(target)
            .map_err(|e| ScrapeError::Browser(format!("element handle: {e}")))?];
        args.extend(extra);
        Ok(self.client.execute(script, args).await?)
    }

    /// Whether the detail body is present and displayed right now.
    async fn panel_visible(&self) -> Result<bool> {
        match self.client.find(Locator::Css(PANEL_BODY_CSS)).await {
            Ok(body) => Ok(body.is_displayed().await?),
            Err(e) => match ScrapeError::from(e) {
                ScrapeError::Interaction {
                    failure: UiFailure::NotFound | UiFailure::Stale,
                    ..
                } => Ok(false),
                other => Err(other),
            },
        }
    }
}

#[async_trait]
impl Interact for WebDriver {
    type Target = Element;

    async fn center(&self, target: &Element, header_offset: i64) -> Result<()> {
        self.run_on(CENTER_SCRIPT, target, vec![json!(header_offset)]).await?;
        Ok(())
    }

    async fn click(&self, target: &Element) -> Result<()> {
        target.click().await?;
        Ok(())
    }

    async fn script_click(&self, target: &Element) -> Result<()> {
        self.run_on("arguments[0].click();", target, Vec::new()).await?;
        Ok(())
    }

    async fn pointer_click(&self, target: &Element) -> Result<()> {
        self.run_on(POINTER_CLICK_SCRIPT, target, Vec::new()).await?;
        Ok(())
    }

    async fn wait_panel(&self, visible: bool, timeout: Duration) -> Result<()> {
        let outcome = poll_until(timeout, move || async move {
            match self.panel_visible().await {
                Ok(now) if now == visible => Some(Ok(())),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            }
        })
        .await;
        outcome.unwrap_or_else(|| {
            let want = if visible { "visible" } else { "hidden" };
            Err(ScrapeError::interaction(
                UiFailure::Timeout,
                format!("detail view not {want} after {}s", timeout.as_secs_f32()),
            ))
        })
    }

    async fn press_close(&self) -> Result<()> {
        self.client.find(Locator::Css(PANEL_CLOSE_CSS)).await?.click().await?;
        Ok(())
    }

    async fn send_escape(&self) -> Result<()> {
        self.client.find(Locator::Css("body")).await?.send_keys(ESCAPE_KEY).await?;
        Ok(())
    }
}
