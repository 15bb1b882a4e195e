//! Headless Chromium engine
//!
//! Drives Chromium over the DevTools protocol with chromiumoxide. Each
//! session owns one browser process, the task polling its CDP handler and a
//! throwaway profile directory, so concurrent sessions share nothing.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, PrintToPdfParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use super::error::{BrowserError, Result};
use super::launch::LaunchConfig;
use super::traits::{BrowserEngine, BrowserPage, BrowserSession};
use super::types::{PdfMargin, PdfOptions, Viewport, WaitUntil};

/// Ceiling for a single CDP request when a page doesn't set its own
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Chromium engine backed by chromiumoxide
#[derive(Debug, Clone, Default)]
pub struct ChromiumEngine;

impl ChromiumEngine {
    pub fn new() -> Self {
        Self
    }
}

fn browser_config(config: &LaunchConfig, user_data_dir: &Path) -> Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .chrome_executable(config.executable_path())
        .args(config.args().iter().cloned())
        .user_data_dir(user_data_dir)
        .request_timeout(DEFAULT_OPERATION_TIMEOUT);

    if !config.headless() {
        builder = builder.with_head();
    }
    if !config.ignore_https_errors() {
        builder = builder.respect_https_errors();
    }
    if let Some(viewport) = config.default_viewport() {
        builder = builder.viewport(CdpViewport {
            width: viewport.width,
            height: viewport.height,
            device_scale_factor: Some(viewport.device_scale_factor),
            emulating_mobile: viewport.is_mobile,
            is_landscape: viewport.is_landscape,
            has_touch: viewport.has_touch,
        });
    }

    builder.build().map_err(BrowserError::Launch)
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self, config: &LaunchConfig) -> Result<Box<dyn BrowserSession>> {
        // Removed on drop, so a failed launch cleans up after itself
        let profile = tempfile::Builder::new()
            .prefix("pdf-export-profile-")
            .tempdir()
            .map_err(|e| BrowserError::Launch(format!("Failed to create profile dir: {}", e)))?;
        let browser_config = browser_config(config, profile.path())?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            closed: false,
            profile,
        }))
    }
}

/// One Chromium process and its CDP handler task
///
/// `profile` is declared last so the directory is removed after the browser
/// has been killed on drop.
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    closed: bool,
    profile: TempDir,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn new_page(&mut self) -> Result<Option<Box<dyn BrowserPage>>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ContextCreation(e.to_string()))?;

        Ok(Some(Box::new(ChromiumPage::new(page))))
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = match self.browser.close().await {
            Ok(_) => Ok(()),
            Err(e) => {
                // The connection is gone; make sure the process is too
                if let Some(Err(kill_err)) = self.browser.kill().await {
                    tracing::warn!("Failed to kill browser process: {}", kill_err);
                }
                Err(BrowserError::Close(e.to_string()))
            }
        };

        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        self.handler_task.abort();
        tracing::debug!("Closed browser with profile {}", self.profile.path().display());

        result
    }

    async fn kill(&mut self) {
        self.closed = true;
        if let Some(Err(e)) = self.browser.kill().await {
            tracing::warn!("Failed to kill browser process: {}", e);
        }
        self.handler_task.abort();
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            // chromiumoxide kills the child when `Browser` drops
            tracing::warn!("Browser session dropped without close; terminating process");
            self.handler_task.abort();
        }
    }
}

/// A Chromium tab with puppeteer-style default timeouts
pub struct ChromiumPage {
    page: Page,
    navigation_timeout: Duration,
    default_timeout: Duration,
}

impl ChromiumPage {
    fn new(page: Page) -> Self {
        Self {
            page,
            navigation_timeout: DEFAULT_OPERATION_TIMEOUT,
            default_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    async fn navigate(&self, url: &str, wait_until: &[WaitUntil]) -> Result<()> {
        let navigation_error = |e: chromiumoxide::error::CdpError| {
            BrowserError::Navigation(format!("{} at {}", e, url))
        };

        // Subscribe before navigating so no lifecycle event is missed
        let mut lifecycle = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.page
            .execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        let navigation = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(navigation_error)?
            .result;

        if let Some(error_text) = navigation.error_text.filter(|text| !text.is_empty()) {
            return Err(BrowserError::Navigation(format!("{} at {}", error_text, url)));
        }

        let mut pending: HashSet<&'static str> =
            wait_until.iter().map(WaitUntil::lifecycle_event).collect();

        while !pending.is_empty() {
            let event = lifecycle.next().await.ok_or_else(|| {
                BrowserError::Navigation(format!("Page closed while loading {}", url))
            })?;

            if event.frame_id != navigation.frame_id {
                continue;
            }
            // Same-document navigations carry no loader id
            if let Some(loader_id) = &navigation.loader_id {
                if &event.loader_id != loader_id {
                    continue;
                }
            }
            pending.remove(event.name.as_str());
        }

        Ok(())
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    fn set_default_navigation_timeout(&mut self, timeout: Duration) {
        self.navigation_timeout = timeout;
    }

    fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            viewport.device_scale_factor,
            viewport.is_mobile,
        );

        tokio::time::timeout(self.default_timeout, self.page.execute(params))
            .await
            .map_err(|_| BrowserError::Timeout {
                operation: "Set viewport",
                timeout: self.default_timeout,
            })?
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        Ok(())
    }

    async fn goto(
        &self,
        url: &str,
        wait_until: &[WaitUntil],
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or(self.navigation_timeout);

        tokio::time::timeout(timeout, self.navigate(url, wait_until))
            .await
            .map_err(|_| BrowserError::Timeout {
                operation: "Navigation",
                timeout,
            })?
    }

    async fn pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        let params = PrintToPdfParams::builder()
            .landscape(false)
            .display_header_footer(options.display_header_footer)
            .print_background(options.print_background)
            .prefer_css_page_size(options.prefer_css_page_size)
            .paper_width(options.paper.width_in)
            .paper_height(options.paper.height_in)
            .margin_top(PdfMargin::px_to_inches(options.margin.top))
            .margin_bottom(PdfMargin::px_to_inches(options.margin.bottom))
            .margin_left(PdfMargin::px_to_inches(options.margin.left))
            .margin_right(PdfMargin::px_to_inches(options.margin.right))
            .build();

        tokio::time::timeout(self.default_timeout, self.page.pdf(params))
            .await
            .map_err(|_| BrowserError::Timeout {
                operation: "PDF export",
                timeout: self.default_timeout,
            })?
            .map_err(|e| BrowserError::Export(e.to_string()))
    }
}
