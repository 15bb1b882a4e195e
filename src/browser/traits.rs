//! Browser traits
//!
//! The narrow capability surface the exporter needs from a headless engine:
//! launch a process, open a page, configure it, navigate, print and close
//! or kill it.

use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::launch::LaunchConfig;
use super::types::{PdfOptions, Viewport, WaitUntil};

/// Starts browser processes
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Launch one browser process configured by `config`
    async fn launch(&self, config: &LaunchConfig) -> Result<Box<dyn BrowserSession>>;
}

/// One running browser process, owned by a single render
///
/// Callers must `close` the session on every path. Dropping an unclosed
/// session terminates the process without waiting for it.
#[async_trait]
pub trait BrowserSession: Send {
    /// Open a new page. `None` means the engine returned no usable handle.
    async fn new_page(&mut self) -> Result<Option<Box<dyn BrowserPage>>>;

    /// Close the browser and reap its process
    async fn close(&mut self) -> Result<()>;

    /// Terminate the process without a graceful close
    async fn kill(&mut self);
}

/// A page within a browser session
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Ceiling applied to navigations that don't pass their own timeout
    fn set_default_navigation_timeout(&mut self, timeout: Duration);

    /// Ceiling applied to every other page operation
    fn set_default_timeout(&mut self, timeout: Duration);

    async fn set_viewport(&self, viewport: Viewport) -> Result<()>;

    /// Navigate and wait until every condition in `wait_until` holds
    async fn goto(
        &self,
        url: &str,
        wait_until: &[WaitUntil],
        timeout: Option<Duration>,
    ) -> Result<()>;

    /// Print the current document
    async fn pdf(&self, options: &PdfOptions) -> Result<Vec<u8>>;
}
