use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language tags the site ships dictionaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocaleTag {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Locale used when nothing else matches, and the target of the fetch fallback.
pub const DEFAULT_LOCALE: LocaleTag = LocaleTag::ZhCn;

impl LocaleTag {
    pub const ALL: [LocaleTag; 2] = [LocaleTag::ZhCn, LocaleTag::EnUs];

    /// Exact-match parse of a tag such as `en-US`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocaleTag::ZhCn => "zh-CN",
            LocaleTag::EnUs => "en-US",
        }
    }

    /// Name shown on the language button.
    pub fn display_name(self) -> &'static str {
        match self {
            LocaleTag::ZhCn => "简体中文",
            LocaleTag::EnUs => "English",
        }
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        DEFAULT_LOCALE
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for LocaleTag {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

pub fn is_supported(tag: &str) -> bool {
    LocaleTag::parse(tag).is_some()
}

/// Pick the starting locale: a supported saved choice wins, then the
/// browser-reported language, then [`DEFAULT_LOCALE`].
pub fn detect(saved: Option<&str>, browser: Option<&str>) -> LocaleTag {
    saved
        .and_then(LocaleTag::parse)
        .or_else(|| browser.and_then(LocaleTag::parse))
        .unwrap_or(DEFAULT_LOCALE)
}
