//! Launch configuration selection
//!
//! Development machines launch a locally installed Chrome with a minimal
//! argument list. Production hosts launch the platform's Chromium build with
//! its serverless argument bundle, sandboxing disabled and TLS errors ignored.

use std::path::{Path, PathBuf};

use crate::config::Environment;

use super::types::Viewport;

/// Local Chrome used when `APP_ENV=development`
pub const DEVELOPMENT_EXECUTABLE_PATH: &str =
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Flags appended to the platform bundle in production
pub const PRODUCTION_SANDBOX_ARGS: [&str; 3] =
    ["--no-sandbox", "--disable-setuid-sandbox", "--disable-gpu"];

/// Where the platform bundle places Chromium when nothing is found on PATH
pub const FALLBACK_EXECUTABLE_PATH: &str = "/tmp/chromium";

/// Executable names probed on PATH, in order
const EXECUTABLE_CANDIDATES: [&str; 5] = [
    "chromium",
    "chromium-browser",
    "google-chrome-stable",
    "google-chrome",
    "headless_shell",
];

/// Arguments tuned for short-lived Chromium processes on constrained hosts
const PLATFORM_ARGS: [&str; 27] = [
    "--allow-pre-commit-input",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-client-side-phishing-detection",
    "--disable-component-extensions-with-background-pages",
    "--disable-component-update",
    "--disable-default-apps",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-hang-monitor",
    "--disable-ipc-flooding-protection",
    "--disable-popup-blocking",
    "--disable-prompt-on-repost",
    "--disable-renderer-backgrounding",
    "--disable-sync",
    "--enable-automation",
    "--export-tagged-pdf",
    "--force-color-profile=srgb",
    "--metrics-recording-only",
    "--no-first-run",
    "--password-store=basic",
    "--use-mock-keychain",
    "--font-render-hinting=none",
    "--hide-scrollbars",
    "--mute-audio",
];

/// Browser launch configuration for one render
///
/// Exactly one variant is built per request; fields never mix across them.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchConfig {
    Development {
        args: Vec<String>,
        executable_path: PathBuf,
    },
    Production {
        args: Vec<String>,
        executable_path: PathBuf,
        default_viewport: Viewport,
    },
}

impl LaunchConfig {
    pub fn args(&self) -> &[String] {
        match self {
            LaunchConfig::Development { args, .. } | LaunchConfig::Production { args, .. } => args,
        }
    }

    pub fn executable_path(&self) -> &Path {
        match self {
            LaunchConfig::Development {
                executable_path, ..
            }
            | LaunchConfig::Production {
                executable_path, ..
            } => executable_path,
        }
    }

    /// `None` keeps the engine's own default viewport
    pub fn default_viewport(&self) -> Option<&Viewport> {
        match self {
            LaunchConfig::Development { .. } => None,
            LaunchConfig::Production {
                default_viewport, ..
            } => Some(default_viewport),
        }
    }

    /// Both variants run headless
    pub fn headless(&self) -> bool {
        true
    }

    pub fn ignore_https_errors(&self) -> bool {
        matches!(self, LaunchConfig::Production { .. })
    }
}

/// Platform-provided Chromium bundle: arguments, viewport and executable
#[derive(Debug, Clone, Default)]
pub struct ChromiumProvider {
    executable_override: Option<PathBuf>,
}

impl ChromiumProvider {
    pub fn new(executable_override: Option<PathBuf>) -> Self {
        Self {
            executable_override,
        }
    }

    pub fn args(&self) -> Vec<String> {
        PLATFORM_ARGS.iter().map(|arg| arg.to_string()).collect()
    }

    pub fn default_viewport(&self) -> Viewport {
        Viewport {
            is_landscape: true,
            ..Viewport::desktop(1920, 1080)
        }
    }

    /// Resolve the Chromium executable.
    ///
    /// Order: configured override, first candidate on PATH, fallback path.
    /// Never fails; a missing binary is reported by the launch instead.
    pub async fn executable_path(&self) -> PathBuf {
        if let Some(path) = &self.executable_override {
            return path.clone();
        }

        let found = tokio::task::spawn_blocking(|| {
            EXECUTABLE_CANDIDATES
                .iter()
                .find_map(|name| which::which(name).ok())
        })
        .await;

        match found {
            Ok(Some(path)) => path,
            Ok(None) => PathBuf::from(FALLBACK_EXECUTABLE_PATH),
            Err(e) => {
                tracing::warn!("Chromium lookup task failed: {}", e);
                PathBuf::from(FALLBACK_EXECUTABLE_PATH)
            }
        }
    }
}

/// Select the launch configuration for `environment`.
///
/// Development resolves immediately; production awaits the provider's
/// executable lookup.
pub async fn select_launch_config(
    environment: Environment,
    provider: &ChromiumProvider,
) -> LaunchConfig {
    match environment {
        Environment::Development => LaunchConfig::Development {
            args: vec!["--no-sandbox".to_string()],
            executable_path: PathBuf::from(DEVELOPMENT_EXECUTABLE_PATH),
        },
        Environment::Production => {
            let mut args = provider.args();
            args.extend(PRODUCTION_SANDBOX_ARGS.iter().map(|arg| arg.to_string()));

            LaunchConfig::Production {
                args,
                executable_path: provider.executable_path().await,
                default_viewport: provider.default_viewport(),
            }
        }
    }
}
