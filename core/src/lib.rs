//! Client-side localization for the Luna Launcher site.
//!
//! [`LocaleSwitcher`] loads a JSON dictionary per language and rewrites the
//! page's tagged elements through the [`Document`] / [`RenderTarget`]
//! abstraction, persisting the choice in a [`KeyValueStore`].

pub mod config;
pub mod dictionary;
pub mod error;
pub mod locale;
pub mod menu;
pub mod relative_time;
pub mod render;
pub mod source;
pub mod stagger;
pub mod storage;
pub mod switcher;
pub mod theme;

pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use locale::{LocaleTag, DEFAULT_LOCALE};
pub use render::{Binding, Document, Mutation, RenderTarget, VirtualDocument, VirtualElement};
pub use source::{load_with_fallback, DictionarySource, DirSource, HttpSource, MemorySource};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use switcher::{LocaleSwitcher, SiteContext};
pub use theme::Theme;
