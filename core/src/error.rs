use std::path::PathBuf;

use thiserror::Error;

use crate::locale::LocaleTag;

/// Errors raised by the locale switcher and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid translation file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("translation file for {0} is not a JSON object")]
    NotAnObject(LocaleTag),
    #[error("failed to load translations for {locale}: {message}")]
    Fetch { locale: LocaleTag, message: String },
    #[error("no translations bundled for {0}")]
    Missing(LocaleTag),
}

pub type Result<T> = std::result::Result<T, Error>;
