//! Browser side of a run: the WebDriver session, the detail-view
//! controller and the live gallery.

pub mod controller;
pub mod driver;
pub mod gallery;
pub mod session;

pub use controller::{Controller, Interact, PanelState};
pub use driver::WebDriver;
pub use gallery::BrowserGallery;
pub use session::BrowserSession;
