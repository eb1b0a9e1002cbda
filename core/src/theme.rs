use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::render::{Binding, Document, Mutation, RenderTarget};
use crate::storage::{KeyValueStore, THEME_KEY};

/// The only theme the site renders.
pub const DARK: &str = "dark";

/// Persisted theme preference. The page is always drawn dark; the stored name
/// only decides which menu option is marked active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme(String);

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self(DARK.to_string())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored theme, or dark when nothing is stored.
pub fn current<K: KeyValueStore>(store: &K) -> Theme {
    store.get(THEME_KEY).map(Theme).unwrap_or_default()
}

/// Persist `theme` and apply it to `doc`.
pub fn set<K: KeyValueStore, D: Document>(store: &mut K, doc: &mut D, theme: &Theme) {
    if let Err(e) = store.set(THEME_KEY, theme.name()) {
        warn!("failed to persist theme: {e}");
    }
    info!("Theme set to {theme}");
    apply(doc, theme);
}

/// Draw the page dark and mark the matching theme option active.
pub fn apply<D: Document>(doc: &mut D, theme: &Theme) {
    doc.set_theme(DARK);
    for target in doc.targets_mut() {
        let option = target.bindings().iter().find_map(|b| match b {
            Binding::ThemeOption(name) => Some(name == theme.name()),
            _ => None,
        });
        match option {
            Some(true) => target.apply(Mutation::AddClass("active")),
            Some(false) => target.apply(Mutation::RemoveClass("active")),
            None => {}
        }
    }
}
