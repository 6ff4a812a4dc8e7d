use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::controller::Controller;
use super::driver::{poll_until, WebDriver};
use crate::config::BrowserOptions;
use crate::engine::{Gallery, ScannedTile};
use crate::error::{Result, ScrapeError};
use crate::selectors::{PANEL_BODY_CSS, PANEL_TITLE_CSS, THUMB_CSS, TILE_CSS};
use crate::tools::clean::{get_text, resolve_url};
use crate::tools::detail::{parse_panel, DetailRecord};
use crate::tools::tile::scan_tile;

/// How long to wait for the detail header before reading it as empty.
const HEADER_TIMEOUT: Duration = Duration::from_secs(5);

const PANEL_SNAPSHOT_SCRIPT: &str = r#"
const body = document.querySelector(arguments[0]);
if (!body) { return null; }
const modal = body.closest(".modal") || body.parentElement || body;
return modal.outerHTML;
"#;

/// The stills browser of a logged-in session.
pub struct BrowserGallery {
    client: Client,
    controller: Controller<WebDriver>,
    panel_timeout: Duration,
    page_url: Url,
}

impl BrowserGallery {
    /// Bind to the page the session is currently showing.
    pub async fn new(client: Client, opts: &BrowserOptions) -> Result<Self> {
        let page_url = client.current_url().await?;
        Ok(Self {
            controller: Controller::new(WebDriver::new(client.clone()), opts),
            client,
            panel_timeout: opts.panel_timeout,
            page_url,
        })
    }

    /// Text of the detail header once it is displayed; empty if it never
    /// shows within `HEADER_TIMEOUT`.
    async fn header_text(&self) -> String {
        match poll_until(HEADER_TIMEOUT, || self.visible_header()).await {
            Some(text) => text,
            None => {
                debug!("detail header never became visible");
                String::new()
            }
        }
    }

    async fn visible_header(&self) -> Option<String> {
        let el = self.client.find(Locator::Css(PANEL_TITLE_CSS)).await.ok()?;
        if !el.is_displayed().await.ok()? {
            return None;
        }
        el.text().await.ok().map(|t| get_text(&t))
    }
}

#[async_trait]
impl Gallery for BrowserGallery {
    type Handle = Element;

    async fn scan(&mut self) -> Result<Vec<ScannedTile<Element>>> {
        let tiles = self.client.find_all(Locator::Css(TILE_CSS)).await?;
        let mut scanned = Vec::with_capacity(tiles.len());

        for tile in tiles {
            // tiles can be re-rendered between listing and reading
            let html = match tile.html(false).await {
                Ok(html) => html,
                Err(e) => {
                    debug!(error = %e, "tile vanished while scanning");
                    continue;
                }
            };
            let mut attrs = scan_tile(&html);
            attrs.thumb_src = resolve_url(&self.page_url, &attrs.thumb_src);

            let thumb = tile.find(Locator::Css(THUMB_CSS)).await;
            let handle = thumb.unwrap_or(tile);
            scanned.push(ScannedTile { attrs, handle });
        }
        Ok(scanned)
    }

    async fn open(&mut self, handle: &Element) -> Result<()> {
        self.controller.open(handle).await
    }

    async fn read_detail(&mut self) -> Result<DetailRecord> {
        let title = self.header_text().await;

        self.client
            .wait()
            .at_most(self.panel_timeout)
            .for_element(Locator::Css(PANEL_BODY_CSS))
            .await
            .map_err(|e| ScrapeError::PanelNotRendered(e.to_string()))?;

        let snapshot = self
            .client
            .execute(PANEL_SNAPSHOT_SCRIPT, vec![json!(PANEL_BODY_CSS)])
            .await?;
        let html = snapshot
            .as_str()
            .ok_or_else(|| ScrapeError::PanelNotRendered("detail body disappeared".into()))?;

        let mut record = parse_panel(html);
        if !title.is_empty() {
            record.title_year_raw = title;
        }
        record.image_url = resolve_url(&self.page_url, &record.image_url);
        Ok(record)
    }

    async fn close(&mut self) -> Result<()> {
        self.controller.close().await;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64> {
        let height = self
            .client
            .execute("return document.body.scrollHeight;", Vec::new())
            .await?;
        height
            .as_u64()
            .or_else(|| height.as_f64().map(|h| h.max(0.0) as u64))
            .ok_or_else(|| ScrapeError::Browser(format!("unexpected scroll height {height}")))
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.client
            .execute("window.scrollTo(0, document.body.scrollHeight);", Vec::new())
            .await?;
        Ok(())
    }
}
