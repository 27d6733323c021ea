//! Memvault: a children's scrapbook memory vault.
//!
//! The crate has two halves:
//!
//! - **Drawing core**: [`canvas::DrawingSurface`], a raster canvas that
//!   turns pointer gestures into strokes under a caller-owned tool
//!   configuration, with content-preserving resize, full reset, and PNG
//!   data-URI export.
//! - **Memory service**: a CRUD HTTP API ([`api`]) over a persistent
//!   collection of [`memory::Memory`] records ([`store`]), the typed
//!   client a shell consumes ([`client`]), and never-fail narrative
//!   generation ([`assist`]).
//!
//! # Example
//!
//! ```
//! use memvault::canvas::{DrawingSurface, Tool, ToolConfig, Rgb};
//!
//! let mut surface = DrawingSurface::new(800);
//! let mut tools = ToolConfig::default();
//! tools.color = Rgb::from_hex("#f87171").unwrap();
//!
//! surface.begin_gesture((100.0, 100.0), &tools);
//! surface.extend_gesture((200.0, 150.0), &tools);
//! tools.tool = Tool::Eraser;
//! surface.extend_gesture((250.0, 150.0), &tools);
//! surface.end_gesture();
//!
//! let data_uri = surface.export_data_uri().unwrap();
//! assert!(data_uri.starts_with("data:image/png;base64,"));
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod canvas;
pub mod memory;
pub mod store;

pub mod api;
pub mod assist;
pub mod client;

pub use canvas::{DrawingSurface, ToolConfig};
pub use client::VaultClient;
pub use memory::{Memory, MemoryDraft, MemoryPatch};
pub use store::MemoryStore;

/// Wiring configuration for the vault: where to listen, where the store
/// lives, where clients should point, and the assist credential. No
/// business-logic effect.
///
/// # Examples
///
/// ```
/// let cfg = memvault::VaultConfig::default();
/// assert_eq!(cfg.port, 5000);
/// assert!(cfg.api_url.ends_with("/api"));
/// ```
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Port the API server listens on.
    pub port: u16,
    /// Path of the JSON store file; `None` keeps records in memory only.
    pub store_path: Option<PathBuf>,
    /// Base URL clients use to reach the API.
    pub api_url: String,
    /// Credential for the narrative assist endpoint.
    pub gemini_api_key: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            port: 5000,
            store_path: None,
            api_url: "http://localhost:5000/api".to_string(),
            gemini_api_key: None,
        }
    }
}

impl VaultConfig {
    /// Read configuration from the environment (`PORT`, `STORE_PATH`,
    /// `API_URL`, `GEMINI_API_KEY`), falling back to defaults.
    pub fn from_env() -> Result<VaultConfig> {
        let mut cfg = VaultConfig::default();
        if let Ok(port) = std::env::var("PORT") {
            cfg.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {port}")))?;
        }
        if let Ok(path) = std::env::var("STORE_PATH") {
            cfg.store_path = Some(PathBuf::from(path));
        }
        if let Ok(url) = std::env::var("API_URL") {
            cfg.api_url = url;
        } else {
            cfg.api_url = format!("http://localhost:{}/api", cfg.port);
        }
        cfg.gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        Ok(cfg)
    }
}
