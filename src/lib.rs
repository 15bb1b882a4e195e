//! PDF Export Server Library
//!
//! Renders a URL in headless Chromium and returns the page as a PDF.
//! The binary in main.rs serves the router built here.
//!
//! # Modules
//!
//! - `browser`: launch configuration and the headless engine seam
//! - `render`: the linear URL → PDF export sequence
//! - `routes`: HTTP endpoints

pub mod browser;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use config::{Config, Environment};
pub use error::AppError;
pub use render::PdfExporter;
pub use state::AppState;
