#![doc = include_str!("../README.md")]

pub mod browser;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod runner;
pub mod selectors;
pub mod tools;
pub mod types;

pub use config::{BrowserOptions, ScrapeOptions, Settings};
pub use engine::{Engine, Gallery, ImageSource, ScannedTile};
pub use error::{Result, ScrapeError, UiFailure};
pub use runner::{RunPlan, RunSummary};
pub use types::*;
