//! Browser value types shared by the engine seam and its implementations

/// CSS pixels per inch, used to convert pixel margins for the print API
pub const CSS_PX_PER_INCH: f64 = 96.0;

/// Logical rendering dimensions of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub is_mobile: bool,
    pub has_touch: bool,
    pub is_landscape: bool,
}

impl Viewport {
    /// Desktop viewport with scale factor 1
    pub const fn desktop(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_scale_factor: 1.0,
            is_mobile: false,
            has_touch: false,
            is_landscape: false,
        }
    }
}

/// Readiness condition a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitUntil {
    /// `DOMContentLoaded` fired for the new document
    DomContentLoaded,
    /// No network connections for at least 500 ms
    NetworkIdle,
}

impl WaitUntil {
    /// Name of the DevTools `Page.lifecycleEvent` that satisfies this condition
    pub fn lifecycle_event(&self) -> &'static str {
        match self {
            WaitUntil::DomContentLoaded => "DOMContentLoaded",
            WaitUntil::NetworkIdle => "networkIdle",
        }
    }
}

/// Paper dimensions in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl PaperSize {
    pub const A4: PaperSize = PaperSize {
        width_in: 8.27,
        height_in: 11.7,
    };
}

/// Page margins in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfMargin {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl PdfMargin {
    pub fn px_to_inches(px: u32) -> f64 {
        f64::from(px) / CSS_PX_PER_INCH
    }
}

/// Print options passed to the engine's PDF export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub paper: PaperSize,
    pub print_background: bool,
    /// Use `@page` size declarations when the document has them
    pub prefer_css_page_size: bool,
    pub display_header_footer: bool,
    pub margin: PdfMargin,
}
