use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::ScrapeOptions;
use crate::tools::detail::DetailRecord;
use crate::tools::export::RowSink;
use crate::tools::images::{ImageFetcher, StoredImage};
use crate::tools::retry::human_pause;
use crate::tools::tile::TileAttributes;
use crate::{error::*, types::*};

/// A rendered tile plus whatever the gallery needs to open it again.
#[derive(Debug, Clone)]
pub struct ScannedTile<H> {
    pub attrs: TileAttributes,
    pub handle: H,
}

/// The live, scrollable list of items. One detail view at a time.
#[async_trait]
pub trait Gallery: Send {
    type Handle: Send + Sync;

    /// Tiles currently rendered, in page order.
    async fn scan(&mut self) -> Result<Vec<ScannedTile<Self::Handle>>>;
    async fn open(&mut self, handle: &Self::Handle) -> Result<()>;
    /// Read the detail view that is currently open.
    async fn read_detail(&mut self) -> Result<DetailRecord>;
    /// Close the detail view; best effort.
    async fn close(&mut self) -> Result<()>;
    async fn scroll_height(&mut self) -> Result<u64>;
    async fn scroll_to_bottom(&mut self) -> Result<()>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Never fails; degraded fetches come back empty.
    async fn fetch(&self, url: &str, shot_id: &str) -> StoredImage;
}

#[async_trait]
impl ImageSource for ImageFetcher {
    async fn fetch(&self, url: &str, shot_id: &str) -> StoredImage {
        ImageFetcher::fetch(self, url, shot_id).await
    }
}

/// Mutable progress of one run.
#[derive(Debug, Default)]
pub struct ScrapeState {
    pub processed_count: usize,
    pub seen: SeenSet,
    pub consecutive_no_new: u32,
    pub last_scroll_height: u64,
}

pub struct Engine<'a, G: Gallery> {
    pub gallery: &'a mut G,
    pub images: &'a dyn ImageSource,
    pub sink: &'a dyn RowSink,
    pub opts: ScrapeOptions,
    pub progress_path: PathBuf,
    state: ScrapeState,
    rows: Vec<ScrapedRow>,
}

impl<'a, G: Gallery> Engine<'a, G> {
    pub fn new(
        gallery: &'a mut G,
        images: &'a dyn ImageSource,
        sink: &'a dyn RowSink,
        opts: ScrapeOptions,
        progress_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            gallery,
            images,
            sink,
            opts,
            progress_path: progress_path.into(),
            state: ScrapeState::default(),
            rows: Vec::new(),
        }
    }

    /// Rows collected so far, also after `run` returned an error.
    pub fn rows(&self) -> &[ScrapedRow] {
        &self.rows
    }

    pub fn state(&self) -> &ScrapeState {
        &self.state
    }

    fn target_reached(&self) -> bool {
        self.state.processed_count >= self.opts.max_shots
    }

    /// Scan, process unseen tiles, scroll for more; repeat until a stop
    /// condition holds. Errors enumerating tiles or scrolling end the run;
    /// errors on a single item only skip that item.
    pub async fn run(&mut self) -> Result<StopReason> {
        self.state.last_scroll_height = self.gallery.scroll_height().await?;

        loop {
            if self.target_reached() {
                return Ok(StopReason::TargetReached);
            }

            let tiles = self.gallery.scan().await?;
            debug!(rendered = tiles.len(), seen = self.state.seen.len(), "scanned tiles");

            let mut new_this_cycle = 0usize;
            for tile in tiles {
                if self.target_reached() {
                    break;
                }
                let shot_id = tile.attrs.shot_id.as_str();
                if shot_id.is_empty() || self.state.seen.contains(shot_id) {
                    continue;
                }

                match self.process(&tile).await {
                    Ok(row) => {
                        self.record(row);
                        new_this_cycle += 1;
                        human_pause(self.opts.item_pause, self.opts.item_pause * 2).await;
                    }
                    Err(e) => {
                        warn!(shot_id = %tile.attrs.shot_id, error = %e, "skipping tile");
                    }
                }
            }

            if new_this_cycle == 0 {
                self.state.consecutive_no_new += 1;
                info!(
                    idle = self.state.consecutive_no_new,
                    max = self.opts.max_idle_cycles,
                    "no new tiles this cycle"
                );
            } else {
                self.state.consecutive_no_new = 0;
            }

            if self.target_reached() {
                return Ok(StopReason::TargetReached);
            }
            if self.state.consecutive_no_new >= self.opts.max_idle_cycles {
                return Ok(StopReason::NoNewItems);
            }

            debug!("scrolling for more tiles");
            self.gallery.scroll_to_bottom().await?;
            human_pause(self.opts.scroll_pause, self.opts.scroll_pause * 2).await;

            let height = self.gallery.scroll_height().await?;
            if height == self.state.last_scroll_height {
                info!(height, "page stopped growing");
                return Ok(StopReason::ContentExhausted);
            }
            self.state.last_scroll_height = height;
        }
    }

    /// Open, read and close one tile. The view is closed on every path,
    /// including a failed open that may have left it half rendered.
    async fn process(&mut self, tile: &ScannedTile<G::Handle>) -> Result<ScrapedRow> {
        if let Err(e) = self.gallery.open(&tile.handle).await {
            self.close_view().await;
            return Err(e);
        }

        let detail = self.gallery.read_detail().await;
        self.close_view().await;
        let detail = detail?;

        let shot_id = tile.attrs.shot_id.as_str();
        let image = self.images.fetch(&detail.image_url, shot_id).await;
        Ok(ScrapedRow::assemble(&tile.attrs, &detail, &image))
    }

    async fn close_view(&mut self) {
        if let Err(e) = self.gallery.close().await {
            debug!(error = %e, "close failed");
        }
    }

    fn record(&mut self, row: ScrapedRow) {
        self.state.seen.insert(row.shot_id());
        self.rows.push(row);
        self.state.processed_count += 1;
        info!(processed = self.state.processed_count, max = self.opts.max_shots, "shot recorded");

        let every = self.opts.checkpoint_every;
        if every > 0 && self.state.processed_count % every == 0 {
            if let Err(e) = self.sink.save(&self.rows, &self.progress_path) {
                warn!(error = %e, path = %self.progress_path.display(), "checkpoint failed");
            }
        }
    }
}
