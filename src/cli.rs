use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{self, BrowserOptions, ScrapeOptions, Settings, DEFAULT_WEBDRIVER_URL};
use crate::logging;
use crate::runner::{self, RunPlan};

#[derive(Parser, Debug)]
#[command(
    name = "stillscrape",
    version,
    about = "Scrape ShotDeck stills into a spreadsheet and an image folder"
)]
pub struct Cli {
    /// How many shots to scrape
    #[arg(long, default_value_t = 100)]
    pub max_shots: usize,

    /// Spreadsheet to write, relative to SHOTDECK_OUTPUT_DIR (.xlsx or .csv)
    #[arg(long, default_value = "shotdeck_center_composition.xlsx")]
    pub out_xlsx: PathBuf,

    /// Image folder, relative to SHOTDECK_OUTPUT_DIR
    #[arg(long, default_value = "shotdeck_images")]
    pub images_dir: PathBuf,

    #[arg(long)]
    pub headless: bool,

    /// Timeout for page loading in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Number of retries for loading the gallery
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Save progress every N items
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Pause between scrolls in seconds
    #[arg(long, default_value_t = 2.0)]
    pub scroll_pause: f64,

    #[arg(long, env = "WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Debug logging for this crate
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scrape_options(&self) -> ScrapeOptions {
        let defaults = ScrapeOptions::default();
        ScrapeOptions {
            max_shots: self.max_shots,
            checkpoint_every: self.batch_size,
            scroll_pause: Duration::try_from_secs_f64(self.scroll_pause)
                .unwrap_or(defaults.scroll_pause),
            ..defaults
        }
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            page_timeout: Duration::from_secs(self.timeout),
            gallery_retries: self.retries,
            ..BrowserOptions::default()
        }
    }

    pub fn plan(&self, settings: Settings) -> RunPlan {
        RunPlan {
            out_path: settings.output_dir.join(&self.out_xlsx),
            images_dir: settings.output_dir.join(&self.images_dir),
            scrape: self.scrape_options(),
            browser: self.browser_options(),
            settings,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let settings = Settings::from_env()?;
    let output_dir = settings.ensure_output_dir()?;
    info!(dir = %output_dir.display(), "output directory");

    let plan = cli.plan(settings);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    let summary = runtime.block_on(runner::run(&plan)).context("scrape failed")?;

    info!(
        reason = ?summary.reason,
        rows = summary.rows,
        path = %summary.output.display(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &str) -> Settings {
        Settings {
            email: "a@b.c".into(),
            password: "pw".into(),
            browse_url: config::DEFAULT_BROWSE_URL.into(),
            output_dir: PathBuf::from(dir),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["stillscrape"]).unwrap();
        assert_eq!(cli.max_shots, 100);
        assert_eq!(cli.out_xlsx, PathBuf::from("shotdeck_center_composition.xlsx"));
        assert_eq!(cli.images_dir, PathBuf::from("shotdeck_images"));
        assert!(!cli.headless);
        assert_eq!(cli.timeout, 60);
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.batch_size, 50);
        assert_eq!(cli.scroll_pause, 2.0);
    }

    #[test]
    fn flags_flow_into_options() {
        let cli = Cli::try_parse_from([
            "stillscrape",
            "--max-shots",
            "7",
            "--headless",
            "--timeout",
            "30",
            "--retries",
            "5",
            "--batch-size",
            "2",
            "--scroll-pause",
            "0.5",
            "--webdriver-url",
            "http://grid:4444",
        ])
        .unwrap();

        let scrape = cli.scrape_options();
        assert_eq!(scrape.max_shots, 7);
        assert_eq!(scrape.checkpoint_every, 2);
        assert_eq!(scrape.scroll_pause, Duration::from_millis(500));

        let browser = cli.browser_options();
        assert!(browser.headless);
        assert_eq!(browser.page_timeout, Duration::from_secs(30));
        assert_eq!(browser.gallery_retries, 5);
        assert_eq!(browser.webdriver_url, "http://grid:4444");
    }

    #[test]
    fn negative_scroll_pause_falls_back_to_default() {
        let cli = Cli::try_parse_from(["stillscrape", "--scroll-pause=-1"]).unwrap();
        assert_eq!(cli.scrape_options().scroll_pause, ScrapeOptions::default().scroll_pause);
    }

    #[test]
    fn paths_resolve_against_output_dir() {
        let cli = Cli::try_parse_from(["stillscrape", "--out-xlsx", "run.csv"]).unwrap();
        let plan = cli.plan(settings("/data/stills"));
        assert_eq!(plan.out_path, PathBuf::from("/data/stills/run.csv"));
        assert_eq!(plan.images_dir, PathBuf::from("/data/stills/shotdeck_images"));
    }
}
