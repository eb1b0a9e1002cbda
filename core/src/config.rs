use ::config::{Config, Environment};
use serde::Deserialize;

/// Where the locale switcher finds dictionaries and keeps its preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding `<tag>.json` translation files.
    pub locales_dir: String,
    /// Fetch dictionaries over HTTP from `<base>/locales/` instead of disk.
    pub locales_base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locales_dir: "public/locales".into(),
            locales_base_url: None,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Config::builder()
            .add_source(Environment::with_prefix("LUNA"))
            .build()
            .ok()
            .and_then(|c| c.try_deserialize().ok())
            .unwrap_or_default()
    }
}
