//! Edge handler for the Luna Launcher site: serves static assets with a
//! single-page-app fallback and stamps caching and security headers.

pub mod assets;
pub mod config;
pub mod server;

pub use assets::{AssetStore, DirAssets, MemoryAssets};
pub use config::EdgeConfig;
pub use server::{cache_control_for, router, run, serve_asset, EdgeState};
