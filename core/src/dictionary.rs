use serde_json::Value;

use crate::error::{Error, Result};
use crate::locale::LocaleTag;

/// Translations for one locale, kept as the parsed JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    tree: Value,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dictionary {
    pub fn empty() -> Self {
        Self {
            tree: Value::Object(Default::default()),
        }
    }

    /// Parse a translation file. The top level must be an object.
    pub fn from_json(locale: LocaleTag, data: &str) -> Result<Self> {
        let tree: Value = serde_json::from_str(data)?;
        Self::from_value(locale, tree)
    }

    pub fn from_value(locale: LocaleTag, tree: Value) -> Result<Self> {
        if !tree.is_object() {
            return Err(Error::NotAnObject(locale));
        }
        Ok(Self { tree })
    }

    /// Resolve a dot-path key such as `hero.stats_none`.
    ///
    /// Only non-empty string leaves resolve.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut node = &self.tree;
        for segment in path.split('.') {
            node = node.get(segment)?;
        }
        node.as_str().filter(|s| !s.is_empty())
    }

    /// Page meta description, stored under the reserved `meta.description` key.
    pub fn meta_description(&self) -> Option<&str> {
        self.lookup("meta.description")
    }

    pub fn is_empty(&self) -> bool {
        self.tree.as_object().map_or(true, |m| m.is_empty())
    }
}
