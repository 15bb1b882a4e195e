//! URL to PDF export
//!
//! The whole request lifecycle is one linear sequence:
//! select launch config → launch → new page → timeouts → viewport →
//! navigate → print → close. Any failure aborts the remaining steps; the
//! browser session is closed on every path before the result is returned.
//!
//! The export ceiling bounds launch and the page steps. Teardown runs after
//! it under its own bound, so a slow close never replaces the step error.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, timeout_at, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::browser::{
    select_launch_config, BrowserEngine, BrowserError, BrowserSession, ChromiumProvider,
    PaperSize, PdfMargin, PdfOptions, Result, Viewport, WaitUntil,
};
use crate::config::Environment;

/// Navigation and per-operation page timeout
pub const PAGE_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Ceiling for launch plus every page step of one export
pub const EXPORT_TIMEOUT: Duration = Duration::from_secs(60);

/// Grace period for a graceful close before the process is killed
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest PDF returned to a client
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

/// Viewport pages are laid out at before printing
pub const RENDER_VIEWPORT: Viewport = Viewport::desktop(1200, 800);

/// Navigation completes once the network is idle and the DOM has loaded
pub const NAVIGATION_WAIT: [WaitUntil; 2] = [WaitUntil::NetworkIdle, WaitUntil::DomContentLoaded];

/// Fixed print layout for exported documents
pub const DOCUMENT_PDF_OPTIONS: PdfOptions = PdfOptions {
    paper: PaperSize::A4,
    print_background: true,
    prefer_css_page_size: true,
    display_header_footer: true,
    margin: PdfMargin {
        top: 90,
        bottom: 32,
        left: 32,
        right: 32,
    },
};

/// Renders URLs to PDF, one fresh browser per call
#[derive(Clone)]
pub struct PdfExporter {
    engine: Arc<dyn BrowserEngine>,
    provider: ChromiumProvider,
    environment: Environment,
}

impl PdfExporter {
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        provider: ChromiumProvider,
        environment: Environment,
    ) -> Self {
        Self {
            engine,
            provider,
            environment,
        }
    }

    /// Render `url` and return the PDF bytes.
    ///
    /// A step error is returned unchanged; teardown failures after it are
    /// only logged.
    pub async fn export(&self, url: &str) -> Result<Vec<u8>> {
        let span = tracing::info_span!("export_pdf", render_id = %Uuid::new_v4(), url);
        self.run(url).instrument(span).await
    }

    async fn run(&self, url: &str) -> Result<Vec<u8>> {
        let deadline = Instant::now() + EXPORT_TIMEOUT;
        let config = select_launch_config(self.environment, &self.provider).await;

        tracing::info!("Environment: {}", self.environment);
        tracing::info!("Platform: {}", std::env::consts::OS);
        tracing::info!(
            executable_path = %config.executable_path().display(),
            args = ?config.args(),
            headless = config.headless(),
            "Chrome options"
        );

        let mut session = timeout_at(deadline, self.engine.launch(&config))
            .await
            .map_err(|_| ceiling_exceeded())??;

        let rendered = timeout_at(deadline, render_document(session.as_mut(), url))
            .await
            .unwrap_or_else(|_| Err(ceiling_exceeded()));

        match (rendered, close_session(session).await) {
            (Ok(pdf), Ok(())) => {
                tracing::info!("Generated PDF of {} bytes", pdf.len());
                Ok(pdf)
            }
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(
                    "Failed to close browser after error ({}): {}",
                    err,
                    close_err
                );
                Err(err)
            }
        }
    }
}

fn ceiling_exceeded() -> BrowserError {
    BrowserError::Timeout {
        operation: "PDF generation",
        timeout: EXPORT_TIMEOUT,
    }
}

/// Close gracefully, killing the process if that takes too long
async fn close_session(mut session: Box<dyn BrowserSession>) -> Result<()> {
    match timeout(CLOSE_TIMEOUT, session.close()).await {
        Ok(result) => result,
        Err(_) => {
            session.kill().await;
            Err(BrowserError::Timeout {
                operation: "Browser close",
                timeout: CLOSE_TIMEOUT,
            })
        }
    }
}

/// Page steps between launch and teardown
async fn render_document(session: &mut dyn BrowserSession, url: &str) -> Result<Vec<u8>> {
    let mut page = session.new_page().await?.ok_or_else(|| {
        BrowserError::ContextCreation("browser returned no page handle".to_string())
    })?;

    page.set_default_navigation_timeout(PAGE_TIMEOUT);
    page.set_default_timeout(PAGE_TIMEOUT);
    page.set_viewport(RENDER_VIEWPORT).await?;

    page.goto(url, &NAVIGATION_WAIT, Some(PAGE_TIMEOUT)).await?;
    tracing::debug!("Navigation finished");

    let pdf = page.pdf(&DOCUMENT_PDF_OPTIONS).await?;
    if pdf.len() > MAX_PDF_BYTES {
        return Err(BrowserError::Export(format!(
            "PDF is {} bytes, larger than the {} byte response limit",
            pdf.len(),
            MAX_PDF_BYTES
        )));
    }

    Ok(pdf)
}
