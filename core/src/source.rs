//! Where dictionaries come from.
//!
//! The page asks a [`DictionarySource`] for `locales/<tag>.json` on every
//! language change. [`load_with_fallback`] wraps a fetch with the single-level
//! fallback to [`DEFAULT_LOCALE`].

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tracing::{debug, error};

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::locale::{LocaleTag, DEFAULT_LOCALE};

pub trait DictionarySource {
    fn fetch(&self, locale: LocaleTag) -> impl Future<Output = Result<Dictionary>> + Send;
}

/// Reads `<dir>/<tag>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, locale: LocaleTag) -> PathBuf {
        self.dir.join(format!("{}.json", locale.as_str()))
    }
}

impl DictionarySource for DirSource {
    fn fetch(&self, locale: LocaleTag) -> impl Future<Output = Result<Dictionary>> + Send {
        let path = self.path_for(locale);
        async move {
            debug!("Fetching: {}", path.display());
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| Error::Io { path, source })?;
            Dictionary::from_json(locale, &data)
        }
    }
}

/// Fetches `<base_url>/locales/<tag>.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Source using a default client.
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self::new(Client::new(), base_url)
    }

    pub fn url_for(&self, locale: LocaleTag) -> String {
        format!(
            "{}/locales/{}.json",
            self.base_url.trim_end_matches('/'),
            locale.as_str()
        )
    }
}

impl DictionarySource for HttpSource {
    fn fetch(&self, locale: LocaleTag) -> impl Future<Output = Result<Dictionary>> + Send {
        let request = self.client.get(self.url_for(locale));
        async move {
            let fetch_err = |message: String| Error::Fetch { locale, message };
            let response = request
                .send()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;
            if !response.status().is_success() {
                return Err(fetch_err(format!("status {}", response.status())));
            }
            let tree: serde_json::Value = response
                .json()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;
            Dictionary::from_value(locale, tree)
        }
    }
}

/// Dictionaries held in memory. Every fetch is recorded, so callers can tell
/// whether a language change actually hit the source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    dictionaries: HashMap<LocaleTag, Dictionary>,
    fetches: Arc<Mutex<Vec<LocaleTag>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: LocaleTag, dictionary: Dictionary) -> Self {
        self.dictionaries.insert(locale, dictionary);
        self
    }

    /// Locales requested so far, in order.
    pub fn fetches(&self) -> Vec<LocaleTag> {
        match self.fetches.lock() {
            Ok(f) => f.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl DictionarySource for MemorySource {
    fn fetch(&self, locale: LocaleTag) -> impl Future<Output = Result<Dictionary>> + Send {
        if let Ok(mut fetches) = self.fetches.lock() {
            fetches.push(locale);
        }
        let found = self
            .dictionaries
            .get(&locale)
            .cloned()
            .ok_or(Error::Missing(locale));
        async move { found }
    }
}

/// Fetch `locale`, falling back to [`DEFAULT_LOCALE`] once on failure.
///
/// Returns the locale whose dictionary was actually loaded, or `None` when the
/// default is unreachable too. Failures are only logged.
pub async fn load_with_fallback<S: DictionarySource>(
    source: &S,
    locale: LocaleTag,
) -> Option<(LocaleTag, Dictionary)> {
    match source.fetch(locale).await {
        Ok(dictionary) => {
            debug!("Translations loaded for {locale}");
            Some((locale, dictionary))
        }
        Err(e) => {
            error!("Error loading translations: {e}");
            if locale == DEFAULT_LOCALE {
                return None;
            }
            match source.fetch(DEFAULT_LOCALE).await {
                Ok(dictionary) => Some((DEFAULT_LOCALE, dictionary)),
                Err(e) => {
                    error!("Error loading translations: {e}");
                    None
                }
            }
        }
    }
}
