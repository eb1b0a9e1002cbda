use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as the static-asset origin.
    pub assets_dir: String,
    pub max_concurrent_requests: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            assets_dir: "public".into(),
            max_concurrent_requests: 100,
        }
    }
}

impl EdgeConfig {
    pub fn from_env() -> Self {
        Config::builder()
            .add_source(Environment::with_prefix("EDGE").try_parsing(true))
            .build()
            .ok()
            .and_then(|c| c.try_deserialize().ok())
            .unwrap_or_default()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address() {
        let cfg = EdgeConfig::default();
        assert_eq!(cfg.address(), "127.0.0.1:8787");
        assert_eq!(cfg.assets_dir, "public");
    }
}
