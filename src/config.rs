//! Run configuration: credentials from the environment plus engine and
//! browser knobs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{Result, ScrapeError};

pub const EMAIL_VAR: &str = "SHOTDECK_EMAIL";
pub const PASSWORD_VAR: &str = "SHOTDECK_PASSWORD";
pub const BROWSE_URL_VAR: &str = "SHOTDECK_BROWSE_URL";
pub const OUTPUT_DIR_VAR: &str = "SHOTDECK_OUTPUT_DIR";

pub const DEFAULT_BROWSE_URL: &str = "https://shotdeck.com/browse/stills";
pub const LOGIN_URL: &str = "https://shotdeck.com/welcome/login";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Periodic checkpoint, rewritten every `checkpoint_every` items.
pub const PROGRESS_FILE: &str = "shotdeck_progress_temp.xlsx";
/// Written when the run aborts with an error.
pub const ERROR_BACKUP_FILE: &str = "shotdeck_error_backup.xlsx";

/// Load `.env` from the working directory or a parent, if there is one.
/// Variables already set in the environment are kept.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Account and location settings taken from the environment.
#[derive(Clone)]
pub struct Settings {
    pub email: String,
    pub password: String,
    pub browse_url: String,
    pub output_dir: PathBuf,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("email", &self.email)
            .field("password", &"***")
            .field("browse_url", &self.browse_url)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let email = get(EMAIL_VAR).ok_or(ScrapeError::MissingCredentials(EMAIL_VAR))?;
        let password = get(PASSWORD_VAR).ok_or(ScrapeError::MissingCredentials(PASSWORD_VAR))?;

        let browse_url = get(BROWSE_URL_VAR).unwrap_or_else(|| {
            tracing::info!(default = DEFAULT_BROWSE_URL, "{} not set, using default", BROWSE_URL_VAR);
            DEFAULT_BROWSE_URL.to_string()
        });
        let output_dir = match get(OUTPUT_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };

        Ok(Self {
            email,
            password,
            browse_url,
            output_dir,
        })
    }

    /// Create the output base directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.output_dir.join(PROGRESS_FILE)
    }

    pub fn error_backup_path(&self) -> PathBuf {
        self.output_dir.join(ERROR_BACKUP_FILE)
    }
}

/// Knobs of the incremental scrape loop.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOptions {
    pub max_shots: usize,
    /// Checkpoint after every this many processed items; 0 disables.
    pub checkpoint_every: usize,
    /// Consecutive cycles without a new item before giving up.
    pub max_idle_cycles: u32,
    /// Base wait after scrolling; the actual wait is in `[pause, 2 * pause)`.
    pub scroll_pause: Duration,
    /// Base wait between items; the actual wait is in `[pause, 2 * pause)`.
    pub item_pause: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_shots: 100,
            checkpoint_every: 50,
            max_idle_cycles: 3,
            scroll_pause: Duration::from_secs(2),
            item_pause: Duration::from_millis(300),
        }
    }
}

/// WebDriver session and detail-view interaction settings.
#[derive(Debug, Clone, Serialize)]
pub struct BrowserOptions {
    pub webdriver_url: String,
    pub headless: bool,
    /// Page load, login and gallery waits; also the image download timeout.
    pub page_timeout: Duration,
    /// How long the detail view may take to become visible after a click.
    pub panel_timeout: Duration,
    /// How long the detail view may take to disappear after closing.
    pub close_timeout: Duration,
    /// Page-level attempts at loading the gallery.
    pub gallery_retries: u32,
    /// Attempts at clicking a thumbnail open.
    pub click_attempts: u32,
    /// Pixels subtracted when centering a tile, to clear the sticky header.
    pub header_offset: i64,
    /// Base pause after scrolling or toggling the detail view.
    pub settle_pause: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            page_timeout: Duration::from_secs(60),
            panel_timeout: Duration::from_secs(15),
            close_timeout: Duration::from_secs(10),
            gallery_retries: 3,
            click_attempts: 3,
            header_offset: 150,
            settle_pause: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_email_is_reported_first() {
        let err = Settings::from_lookup(lookup(&[(PASSWORD_VAR, "pw")])).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingCredentials(EMAIL_VAR)));
    }

    #[test]
    fn blank_password_counts_as_missing() {
        let err = Settings::from_lookup(lookup(&[(EMAIL_VAR, "a@b.c"), (PASSWORD_VAR, "  ")]))
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingCredentials(PASSWORD_VAR)));
    }

    #[test]
    fn defaults_apply_for_optional_values() {
        let settings =
            Settings::from_lookup(lookup(&[(EMAIL_VAR, "a@b.c"), (PASSWORD_VAR, "pw")])).unwrap();
        assert_eq!(settings.browse_url, DEFAULT_BROWSE_URL);
        assert_eq!(settings.output_dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn checkpoint_paths_live_in_output_dir() {
        let settings = Settings::from_lookup(lookup(&[
            (EMAIL_VAR, "a@b.c"),
            (PASSWORD_VAR, "pw"),
            (OUTPUT_DIR_VAR, "/tmp/stills"),
        ]))
        .unwrap();
        assert_eq!(settings.progress_path(), Path::new("/tmp/stills").join(PROGRESS_FILE));
        assert_eq!(settings.error_backup_path(), Path::new("/tmp/stills").join(ERROR_BACKUP_FILE));
    }

    #[test]
    fn ensure_output_dir_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        let settings = Settings {
            email: "a@b.c".into(),
            password: "pw".into(),
            browse_url: DEFAULT_BROWSE_URL.into(),
            output_dir: dir.clone(),
        };
        settings.ensure_output_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn debug_hides_password() {
        let settings =
            Settings::from_lookup(lookup(&[(EMAIL_VAR, "a@b.c"), (PASSWORD_VAR, "hunter2")]))
                .unwrap();
        assert!(!format!("{settings:?}").contains("hunter2"));
    }

    #[test]
    fn options_serialize_for_startup_log() {
        let json = serde_json::to_value(ScrapeOptions::default()).unwrap();
        assert_eq!(json["max_shots"], 100);
        assert_eq!(json["checkpoint_every"], 50);
        let json = serde_json::to_value(BrowserOptions::default()).unwrap();
        assert_eq!(json["header_offset"], 150);
    }
}
