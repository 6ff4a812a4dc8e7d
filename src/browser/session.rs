//! WebDriver session bootstrap: connect, log in, reach the gallery, and hand
//! the session cookies to an HTTP client for image downloads.

use fantoccini::{Client, ClientBuilder, Locator};
use reqwest::cookie::Jar;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::driver::POLL_INTERVAL;
use crate::config::{BrowserOptions, Settings, LOGIN_URL};
use crate::error::{Result, ScrapeError};
use crate::selectors::{LOGIN_PASS_CSS, LOGIN_SUBMIT_CSS, LOGIN_USER_CSS, TILE_CSS};
use crate::tools::retry::{human_pause, RetryPolicy};

const USER_AGENT: &str = "Mozilla/5.0";
const LOGIN_TIMEOUT: Duration = Duration::from_secs(20);
/// Wait before refreshing a gallery that did not render.
const REFRESH_DELAY: Duration = Duration::from_secs(5);
/// Wait after the refresh before looking again.
const AFTER_REFRESH_DELAY: Duration = Duration::from_secs(3);

/// Chrome capabilities for the session.
pub fn capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec![
        "--window-size=1920,1080",
        "--disable-blink-features=AutomationControlled",
        "--no-sandbox",
        "--disable-dev-shm-usage",
    ];
    if headless {
        args.insert(0, "--headless=new");
    }

    let mut caps = Map::new();
    caps.insert("browserName".into(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".into(),
        json!({
            "args": args,
            "excludeSwitches": ["enable-automation"],
            "useAutomationExtension": false,
        }),
    );
    caps
}

pub struct BrowserSession {
    client: Client,
    opts: BrowserOptions,
}

impl BrowserSession {
    pub async fn connect(opts: &BrowserOptions) -> Result<Self> {
        info!(url = %opts.webdriver_url, headless = opts.headless, "connecting to webdriver");
        let client = ClientBuilder::native()
            .capabilities(capabilities(opts.headless))
            .connect(&opts.webdriver_url)
            .await?;
        Ok(Self {
            client,
            opts: opts.clone(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn login(&self, settings: &Settings) -> Result<()> {
        info!(email = %settings.email, "logging in");
        self.client.goto(LOGIN_URL).await?;

        let user = self
            .client
            .wait()
            .at_most(LOGIN_TIMEOUT)
            .for_element(Locator::Css(LOGIN_USER_CSS))
            .await
            .map_err(|e| ScrapeError::Session(format!("login form did not load: {e}")))?;
        user.send_keys(&settings.email).await?;
        self.client
            .find(Locator::Css(LOGIN_PASS_CSS))
            .await?
            .send_keys(&settings.password)
            .await?;
        self.client.find(Locator::Css(LOGIN_SUBMIT_CSS)).await?.click().await?;

        self.client
            .wait()
            .at_most(LOGIN_TIMEOUT)
            .for_element(Locator::Css("body"))
            .await
            .map_err(|e| ScrapeError::Session(format!("no page after login: {e}")))?;
        human_pause(Duration::from_millis(300), Duration::from_millis(900)).await;
        Ok(())
    }

    /// Navigate to the browse page and wait until it is loaded and tiles render.
    pub async fn open_gallery(&self, browse_url: &str) -> Result<()> {
        info!(url = browse_url, "opening gallery");
        self.client.goto(browse_url).await?;
        self.wait_ready().await?;
        self.wait_for_gallery().await
    }

    async fn wait_ready(&self) -> Result<()> {
        let deadline = Instant::now() + self.opts.page_timeout;
        loop {
            let state = self
                .client
                .execute("return document.readyState;", Vec::new())
                .await?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Session(format!(
                    "page not ready after {}s",
                    self.opts.page_timeout.as_secs()
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_for_gallery(&self) -> Result<()> {
        let attempts = self.opts.gallery_retries.max(1);
        let policy = RetryPolicy::fixed(attempts, REFRESH_DELAY);
        let client = &self.client;
        let timeout = self.opts.page_timeout;

        let loaded = policy
            .run("gallery load", |_| true, move |attempt| async move {
                if attempt > 1 {
                    warn!(attempt, max = attempts, "gallery not loaded, refreshing");
                    client.refresh().await?;
                    sleep(AFTER_REFRESH_DELAY).await;
                }
                client
                    .wait()
                    .at_most(timeout)
                    .for_element(Locator::Css(TILE_CSS))
                    .await?;
                Ok(())
            })
            .await;

        match loaded {
            Ok(()) => {
                info!("gallery loaded");
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "last gallery wait failed");
                Err(ScrapeError::GalleryLoad { attempts })
            }
        }
    }

    /// HTTP client carrying the browser's cookies, for gated image URLs.
    pub async fn http_client(&self) -> Result<reqwest::Client> {
        let page = self.client.current_url().await?;
        let cookies = self.client.get_all_cookies().await?;
        let jar = Jar::default();
        for cookie in &cookies {
            let domain = cookie.domain().or(page.host_str()).unwrap_or_default();
            jar.add_cookie_str(
                &cookie_header(cookie.name(), cookie.value(), domain),
                &cookie_url(&page, domain),
            );
        }
        debug!(cookies = cookies.len(), "copied session cookies");

        Ok(reqwest::Client::builder()
            .cookie_provider(Arc::new(jar))
            .user_agent(USER_AGENT)
            .build()?)
    }

    /// End the WebDriver session. Failures are logged only.
    pub async fn close(self) {
        match self.client.close().await {
            Ok(()) => info!("browser session closed"),
            Err(e) => warn!(error = %e, "failed to close browser session"),
        }
    }
}

fn cookie_header(name: &str, value: &str, domain: &str) -> String {
    if domain.is_empty() {
        format!("{name}={value}; Path=/")
    } else {
        format!("{name}={value}; Domain={domain}; Path=/")
    }
}

/// URL the jar files a cookie under: the cookie's own domain on the page's
/// scheme, or the page itself when the domain does not parse.
fn cookie_url(page: &Url, domain: &str) -> Url {
    let host = domain.trim_start_matches('.');
    if host.is_empty() {
        return page.clone();
    }
    Url::parse(&format!("{}://{}/", page.scheme(), host)).unwrap_or_else(|_| page.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome_args(caps: &Map<String, Value>) -> Vec<String> {
        caps["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn headless_adds_flag() {
        let caps = capabilities(true);
        assert!(chrome_args(&caps).contains(&"--headless=new".to_string()));
        assert_eq!(caps["goog:chromeOptions"]["excludeSwitches"][0], "enable-automation");
    }

    #[test]
    fn headed_has_no_headless_flag() {
        let args = chrome_args(&capabilities(false));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
    }

    #[test]
    fn cookie_header_with_and_without_domain() {
        assert_eq!(cookie_header("sid", "abc", ".shotdeck.com"), "sid=abc; Domain=.shotdeck.com; Path=/");
        assert_eq!(cookie_header("sid", "abc", ""), "sid=abc; Path=/");
    }

    #[test]
    fn cookie_url_strips_leading_dot() {
        let page = Url::parse("https://shotdeck.com/browse/stills").unwrap();
        assert_eq!(cookie_url(&page, ".shotdeck.com").as_str(), "https://shotdeck.com/");
        assert_eq!(cookie_url(&page, "").as_str(), page.as_str());
    }
}
