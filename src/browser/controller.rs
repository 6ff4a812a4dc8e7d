//! Detail-view open/close with layered click fallbacks.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::BrowserOptions;
use crate::error::{Result, ScrapeError};
use crate::tools::retry::{human_pause, RetryPolicy};

/// Low-level page actions the controller is built from.
#[async_trait]
pub trait Interact: Send + Sync {
    type Target: Send + Sync;

    /// Scroll `target` to the middle of the viewport, `header_offset` px higher.
    async fn center(&self, target: &Self::Target, header_offset: i64) -> Result<()>;
    /// Native WebDriver click.
    async fn click(&self, target: &Self::Target) -> Result<()>;
    /// `element.click()` from script; ignores overlays.
    async fn script_click(&self, target: &Self::Target) -> Result<()>;
    /// Synthetic pointer move, press and release over the element.
    async fn pointer_click(&self, target: &Self::Target) -> Result<()>;
    /// Wait until the detail view is (in)visible.
    async fn wait_panel(&self, visible: bool, timeout: Duration) -> Result<()>;
    async fn press_close(&self) -> Result<()>;
    async fn send_escape(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Opening,
    Open,
    Closing,
    /// The last open attempt failed; the next open starts over.
    Failed,
}

pub struct Controller<I: Interact> {
    driver: I,
    click_policy: RetryPolicy,
    panel_timeout: Duration,
    close_timeout: Duration,
    header_offset: i64,
    settle_pause: Duration,
    state: PanelState,
}

impl<I: Interact> Controller<I> {
    pub fn new(driver: I, opts: &BrowserOptions) -> Self {
        Self {
            driver,
            click_policy: RetryPolicy {
                max_attempts: opts.click_attempts,
                delay: Duration::from_secs(1),
                jitter: Duration::from_secs(1),
            },
            panel_timeout: opts.panel_timeout,
            close_timeout: opts.close_timeout,
            header_offset: opts.header_offset,
            settle_pause: opts.settle_pause,
            state: PanelState::Closed,
        }
    }

    pub fn with_click_policy(mut self, policy: RetryPolicy) -> Self {
        self.click_policy = policy;
        self
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn driver(&self) -> &I {
        &self.driver
    }

    fn transition(&mut self, next: PanelState) {
        debug!(from = ?self.state, to = ?next, "detail view");
        self.state = next;
    }

    /// Open the detail view for `target`. On error the view may be left in
    /// any state; callers should still `close`.
    pub async fn open(&mut self, target: &I::Target) -> Result<()> {
        self.transition(PanelState::Opening);
        match self.try_open(target).await {
            Ok(()) => {
                self.transition(PanelState::Open);
                Ok(())
            }
            Err(e) => {
                self.transition(PanelState::Failed);
                Err(e)
            }
        }
    }

    async fn try_open(&self, target: &I::Target) -> Result<()> {
        let driver = &self.driver;
        let offset = self.header_offset;
        let settle = self.settle_pause;

        driver.center(target, offset).await?;
        human_pause(settle, settle * 2).await;

        self.click_policy
            .run("open detail view", ScrapeError::is_transient, move |attempt| async move {
                let err = match driver.click(target).await {
                    Ok(()) => return Ok(()),
                    Err(e) if e.is_transient() => e,
                    Err(e) => return Err(e),
                };
                debug!(attempt, error = %err, "direct click failed, trying fallbacks");

                driver.center(target, offset).await?;
                human_pause(settle, settle * 2).await;
                if driver.script_click(target).await.is_ok() {
                    return Ok(());
                }
                if driver.pointer_click(target).await.is_ok() {
                    return Ok(());
                }
                Err(err)
            })
            .await?;

        driver
            .wait_panel(true, self.panel_timeout)
            .await
            .map_err(|e| ScrapeError::PanelNotRendered(e.to_string()))?;
        human_pause(settle, settle * 2).await;
        Ok(())
    }

    /// Close the detail view: close button first, Escape if that does not
    /// hide it. Never fails. Always settles before returning.
    pub async fn close(&mut self) {
        self.transition(PanelState::Closing);

        let closed = match self.driver.press_close().await {
            Ok(()) => self.driver.wait_panel(false, self.close_timeout).await,
            Err(e) => Err(e),
        };
        if let Err(e) = closed {
            debug!(error = %e, "close button failed, sending Escape");
            if let Err(e) = self.driver.send_escape().await {
                debug!(error = %e, "escape failed");
            }
        }
        human_pause(self.settle_pause, self.settle_pause).await;

        self.transition(PanelState::Closed);
    }
}
