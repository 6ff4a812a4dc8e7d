use fantoccini::error::{CmdError, ErrorStatus};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Kind of UI failure reported by the browser for a single interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFailure {
    /// Another element received the click (overlay, sticky header).
    Intercepted,
    /// The element reference went stale after a DOM reflow.
    Stale,
    NotFound,
    Timeout,
    Other,
}

impl UiFailure {
    /// Intercepted clicks and stale references usually clear up after a re-scroll.
    pub fn is_transient(self) -> bool {
        matches!(self, UiFailure::Intercepted | UiFailure::Stale)
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("missing credentials: set {0} in the environment or a .env file")]
    MissingCredentials(&'static str),

    #[error("browser session: {0}")]
    Session(String),

    #[error("ui interaction failed ({failure:?}): {detail}")]
    Interaction { failure: UiFailure, detail: String },

    #[error("detail panel not rendered: {0}")]
    PanelNotRendered(String),

    #[error("gallery did not load after {attempts} attempts")]
    GalleryLoad { attempts: u32 },

    #[error("webdriver: {0}")]
    Browser(String),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("export: {0}")]
    Export(String),

    #[error("image: {0}")]
    Image(String),
}

impl ScrapeError {
    pub fn interaction(failure: UiFailure, detail: impl Into<String>) -> Self {
        ScrapeError::Interaction {
            failure,
            detail: detail.into(),
        }
    }

    /// Whether a local retry (re-scroll, alternate click) may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Interaction { failure, .. } => failure.is_transient(),
            _ => false,
        }
    }
}

/* WebDriver status codes map onto the UI failure taxonomy */
impl From<CmdError> for ScrapeError {
    fn from(e: CmdError) -> Self {
        let failure = match &e {
            CmdError::Standard(wd) => match wd.error {
                ErrorStatus::ElementClickIntercepted => Some(UiFailure::Intercepted),
                ErrorStatus::StaleElementReference => Some(UiFailure::Stale),
                ErrorStatus::NoSuchElement => Some(UiFailure::NotFound),
                ErrorStatus::Timeout => Some(UiFailure::Timeout),
                _ => None,
            },
            CmdError::WaitTimeout => Some(UiFailure::Timeout),
            _ => None,
        };
        match failure {
            Some(failure) => ScrapeError::interaction(failure, e.to_string()),
            None => ScrapeError::Browser(e.to_string()),
        }
    }
}

impl From<fantoccini::error::NewSessionError> for ScrapeError {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        ScrapeError::Session(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ScrapeError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ScrapeError::Export(e.to_string())
    }
}

impl From<csv::Error> for ScrapeError {
    fn from(e: csv::Error) -> Self {
        ScrapeError::Export(e.to_string())
    }
}

impl From<image::ImageError> for ScrapeError {
    fn from(e: image::ImageError) -> Self {
        ScrapeError::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::WebDriver;

    #[test]
    fn only_intercepted_and_stale_are_transient() {
        assert!(ScrapeError::interaction(UiFailure::Intercepted, "x").is_transient());
        assert!(ScrapeError::interaction(UiFailure::Stale, "x").is_transient());
        assert!(!ScrapeError::interaction(UiFailure::NotFound, "x").is_transient());
        assert!(!ScrapeError::interaction(UiFailure::Timeout, "x").is_transient());
        assert!(!ScrapeError::PanelNotRendered("x".into()).is_transient());
    }

    #[test]
    fn wait_timeout_maps_to_timeout_failure() {
        let err: ScrapeError = CmdError::WaitTimeout.into();
        assert!(matches!(
            err,
            ScrapeError::Interaction {
                failure: UiFailure::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn webdriver_statuses_map_to_ui_failures() {
        let cases = [
            (ErrorStatus::ElementClickIntercepted, UiFailure::Intercepted),
            (ErrorStatus::StaleElementReference, UiFailure::Stale),
            (ErrorStatus::NoSuchElement, UiFailure::NotFound),
            (ErrorStatus::Timeout, UiFailure::Timeout),
        ];
        for (status, expected) in cases {
            let err: ScrapeError = CmdError::Standard(WebDriver::new(status, "boom")).into();
            match err {
                ScrapeError::Interaction { failure, .. } => assert_eq!(failure, expected),
                other => panic!("expected interaction failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_statuses_are_browser_errors() {
        let err: ScrapeError =
            CmdError::Standard(WebDriver::new(ErrorStatus::JavascriptError, "boom")).into();
        assert!(matches!(err, ScrapeError::Browser(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn missing_credentials_names_the_variable() {
        let msg = ScrapeError::MissingCredentials("SHOTDECK_EMAIL").to_string();
        assert!(msg.contains("SHOTDECK_EMAIL"));
    }
}
