//! Headless browser integration
//!
//! - `launch`: environment-dependent launch configuration
//! - `traits`: engine/session/page capability seam
//! - `chromium`: chromiumoxide implementation of the seam

pub mod chromium;
pub mod error;
pub mod launch;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use chromium::ChromiumEngine;
pub use error::{BrowserError, Result};
pub use launch::{select_launch_config, ChromiumProvider, LaunchConfig};
pub use traits::{BrowserEngine, BrowserPage, BrowserSession};
pub use types::{PaperSize, PdfMargin, PdfOptions, Viewport, WaitUntil};
