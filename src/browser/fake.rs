//! In-memory engine for exercising the export sequence without Chromium

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::error::{BrowserError, Result};
use super::launch::LaunchConfig;
use super::traits::{BrowserEngine, BrowserPage, BrowserSession};
use super::types::{PdfOptions, Viewport, WaitUntil};

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n1 0 obj<<>>endobj\n%%EOF\n";

/// Step at which the fake engine fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Launch,
    NewPage,
    NoPage,
    Navigation,
    NavigationTimeout,
    Viewport,
    Export,
    Close,
    /// Close never finishes
    SlowClose,
    /// Navigation never finishes
    Hang,
}

/// What the fake saw, shared across every session it launched
#[derive(Debug, Default)]
pub struct Probe {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub kills: AtomicUsize,
    /// Sessions launched and not yet dropped
    pub live: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
    pub configs: Mutex<Vec<LaunchConfig>>,
}

impl Probe {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn kills(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct FakeEngine {
    faults: Vec<Fault>,
    pdf: Option<Vec<u8>>,
    pub probe: Arc<Probe>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(faults: &[Fault]) -> Self {
        Self {
            faults: faults.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_pdf(pdf: Vec<u8>) -> Self {
        Self {
            pdf: Some(pdf),
            ..Self::default()
        }
    }
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self, config: &LaunchConfig) -> Result<Box<dyn BrowserSession>> {
        self.probe.configs.lock().unwrap().push(config.clone());
        if self.faults.contains(&Fault::Launch) {
            return Err(BrowserError::Launch(format!(
                "No such file or directory: {}",
                config.executable_path().display()
            )));
        }

        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        self.probe.live.fetch_add(1, Ordering::SeqCst);
        self.probe.record("launch");

        Ok(Box::new(FakeSession {
            faults: self.faults.clone(),
            pdf: self.pdf.clone().unwrap_or_else(|| FAKE_PDF.to_vec()),
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct FakeSession {
    faults: Vec<Fault>,
    pdf: Vec<u8>,
    probe: Arc<Probe>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_page(&mut self) -> Result<Option<Box<dyn BrowserPage>>> {
        self.probe.record("new_page");
        if self.faults.contains(&Fault::NewPage) {
            return Err(BrowserError::ContextCreation("Target closed".to_string()));
        }
        if self.faults.contains(&Fault::NoPage) {
            return Ok(None);
        }
        Ok(Some(Box::new(FakePage {
            faults: self.faults.clone(),
            pdf: self.pdf.clone(),
            probe: Arc::clone(&self.probe),
        })))
    }

    async fn close(&mut self) -> Result<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        self.probe.record("close");
        if self.faults.contains(&Fault::SlowClose) {
            std::future::pending::<()>().await;
        }
        if self.faults.contains(&Fault::Close) {
            return Err(BrowserError::Close("connection reset".to_string()));
        }
        Ok(())
    }

    async fn kill(&mut self) {
        self.probe.kills.fetch_add(1, Ordering::SeqCst);
        self.probe.record("kill");
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.probe.live.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FakePage {
    faults: Vec<Fault>,
    pdf: Vec<u8>,
    probe: Arc<Probe>,
}

#[async_trait]
impl BrowserPage for FakePage {
    fn set_default_navigation_timeout(&mut self, timeout: Duration) {
        self.probe
            .record(format!("navigation_timeout {}", timeout.as_millis()));
    }

    fn set_default_timeout(&mut self, timeout: Duration) {
        self.probe.record(format!("timeout {}", timeout.as_millis()));
    }

    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        self.probe
            .record(format!("viewport {}x{}", viewport.width, viewport.height));
        if self.faults.contains(&Fault::Viewport) {
            return Err(BrowserError::Protocol(
                "Emulation.setDeviceMetricsOverride: Target closed".to_string(),
            ));
        }
        Ok(())
    }

    async fn goto(
        &self,
        url: &str,
        wait_until: &[WaitUntil],
        timeout: Option<Duration>,
    ) -> Result<()> {
        let timeout = timeout.unwrap_or_default();
        self.probe.record(format!(
            "goto {} {:?} {}",
            url,
            wait_until,
            timeout.as_millis()
        ));
        if self.faults.contains(&Fault::Hang) {
            std::future::pending::<()>().await;
        }
        if self.faults.contains(&Fault::NavigationTimeout) {
            return Err(BrowserError::Timeout {
                operation: "Navigation",
                timeout,
            });
        }
        if self.faults.contains(&Fault::Navigation) {
            return Err(BrowserError::Navigation(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            )));
        }
        Ok(())
    }

    async fn pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.probe.record(format!(
            "pdf {:?} margin {}/{}/{}/{}",
            options.paper,
            options.margin.top,
            options.margin.bottom,
            options.margin.left,
            options.margin.right
        ));
        if self.faults.contains(&Fault::Export) {
            return Err(BrowserError::Export("Printing failed".to_string()));
        }
        Ok(self.pdf.clone())
    }
}
