//! One complete run: session, scrape, final save, teardown.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::browser::{BrowserGallery, BrowserSession};
use crate::config::{BrowserOptions, ScrapeOptions, Settings};
use crate::engine::Engine;
use crate::error::Result;
use crate::tools::export::{RowSink, SpreadsheetSink};
use crate::tools::images::ImageFetcher;
use crate::types::{ScrapedRow, StopReason};

/// Everything a run needs, resolved against the output directory.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub settings: Settings,
    pub scrape: ScrapeOptions,
    pub browser: BrowserOptions,
    pub out_path: PathBuf,
    pub images_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub reason: StopReason,
    pub rows: usize,
    pub output: PathBuf,
}

/// Run the whole scrape. The browser session is closed on every path.
pub async fn run(plan: &RunPlan) -> Result<RunSummary> {
    info!(
        scrape = %serde_json::to_string(&plan.scrape).unwrap_or_default(),
        browser = %serde_json::to_string(&plan.browser).unwrap_or_default(),
        "effective configuration"
    );
    info!(images = %plan.images_dir.display(), output = %plan.out_path.display(), "output locations");

    let session = BrowserSession::connect(&plan.browser).await?;
    let outcome = scrape(&session, plan).await;
    session.close().await;
    outcome
}

async fn scrape(session: &BrowserSession, plan: &RunPlan) -> Result<RunSummary> {
    session.login(&plan.settings).await?;
    session.open_gallery(&plan.settings.browse_url).await?;

    let http = session.http_client().await?;
    let images = ImageFetcher::new(http, &plan.images_dir).with_timeout(plan.browser.page_timeout);
    let mut gallery = BrowserGallery::new(session.client().clone(), &plan.browser).await?;
    let sink = SpreadsheetSink;

    let mut engine = Engine::new(
        &mut gallery,
        &images,
        &sink,
        plan.scrape.clone(),
        plan.settings.progress_path(),
    );
    let outcome = engine.run().await;

    persist(
        outcome,
        engine.rows(),
        &sink,
        &plan.out_path,
        &plan.settings.error_backup_path(),
    )
}

/// Write the final output, or the emergency backup when the run or the
/// final write failed. The original error takes precedence over a failed backup.
pub fn persist(
    outcome: Result<StopReason>,
    rows: &[ScrapedRow],
    sink: &dyn RowSink,
    out_path: &Path,
    backup_path: &Path,
) -> Result<RunSummary> {
    let result = outcome.and_then(|reason| {
        if sink.save(rows, out_path)? {
            info!(?reason, rows = rows.len(), path = %out_path.display(), "final results saved");
        } else {
            info!(?reason, "no rows collected, nothing to save");
        }
        Ok(RunSummary {
            reason,
            rows: rows.len(),
            output: out_path.to_path_buf(),
        })
    });

    if let Err(e) = &result {
        error!(error = %e, rows = rows.len(), "scrape aborted");
        match sink.save(rows, backup_path) {
            Ok(true) => info!(path = %backup_path.display(), "error backup saved"),
            Ok(false) => {}
            Err(save_err) => error!(error = %save_err, "error backup failed"),
        }
    }
    result
}
