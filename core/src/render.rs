//! Renderable targets: the page elements the switcher rewrites.
//!
//! A [`Document`] exposes its tagged elements as [`RenderTarget`]s. Each
//! target carries the [`Binding`]s read from its `data-i18n*` attributes and
//! accepts [`Mutation`]s. [`VirtualDocument`] is a headless implementation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::locale::LocaleTag;

/// The latest-commit statistic shown in the hero section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: Option<String>,
    pub committed_at: DateTime<Utc>,
}

/// What an element is tagged for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `data-i18n`: text content, swapped with the staggered fade.
    Text(String),
    /// `data-i18n-html`
    Html(String),
    /// `data-i18n-placeholder`
    Placeholder(String),
    /// `data-i18n-aria`
    AriaLabel(String),
    /// `data-i18n-alt`
    Alt(String),
    /// `data-i18n-lang`: visible only while this locale is active.
    LocaleOnly(String),
    /// `data-i18n-none`: "none" placeholder text refreshed on every change.
    NoneMarker,
    /// `.current-lang` label on the language button.
    CurrentLanguage,
    /// `.language-option[data-lang]` entry in the language menu.
    LanguageOption(LocaleTag),
    /// `.theme-option[data-theme]` entry in the theme menu.
    ThemeOption(String),
    /// `#stat-commit` value; `None` while loading or empty.
    CommitStat(Option<CommitInfo>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetText(String),
    SetHtml(String),
    SetPlaceholder(String),
    SetAttribute { name: &'static str, value: String },
    SetAlt(String),
    SetVisible(bool),
    AddClass(&'static str),
    RemoveClass(&'static str),
}

/// On-screen position of an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

pub trait RenderTarget {
    fn bindings(&self) -> &[Binding];
    fn bounds(&self) -> Rect;
    fn apply(&mut self, mutation: Mutation);

    fn text_key(&self) -> Option<&str> {
        self.bindings().iter().find_map(|b| match b {
            Binding::Text(key) => Some(key.as_str()),
            _ => None,
        })
    }
}

/// The two drop-down menus in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Menu {
    Language,
    Theme,
}

pub trait Document {
    type Target: RenderTarget;

    fn targets(&self) -> &[Self::Target];
    fn targets_mut(&mut self) -> &mut [Self::Target];

    /// `<html lang>` and `<body data-lang>`.
    fn set_language(&mut self, locale: LocaleTag);
    fn set_meta_description(&mut self, text: &str);
    /// Key of `<title data-i18n>`, if the page has one.
    fn title_key(&self) -> Option<&str>;
    fn set_title(&mut self, text: &str);
    /// `<html data-theme>`.
    fn set_theme(&mut self, theme: &str);
    fn set_menu_open(&mut self, menu: Menu, open: bool);

    fn target_mut(&mut self, index: usize) -> Option<&mut Self::Target> {
        self.targets_mut().get_mut(index)
    }
}

/// In-memory element keeping the state a browser element would have.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualElement {
    pub bindings: Vec<Binding>,
    pub bounds: Rect,
    pub text: String,
    pub html: String,
    pub placeholder: String,
    pub alt: String,
    pub attributes: BTreeMap<String, String>,
    pub visible: bool,
    pub classes: BTreeSet<&'static str>,
    /// Every mutation applied, in order.
    pub log: Vec<Mutation>,
}

impl VirtualElement {
    pub fn new(binding: Binding) -> Self {
        Self {
            bindings: vec![binding],
            visible: true,
            ..Default::default()
        }
    }

    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.bounds = Rect::new(top, left);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl RenderTarget for VirtualElement {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn apply(&mut self, mutation: Mutation) {
        match &mutation {
            Mutation::SetText(t) => self.text = t.clone(),
            Mutation::SetHtml(h) => self.html = h.clone(),
            Mutation::SetPlaceholder(p) => self.placeholder = p.clone(),
            Mutation::SetAttribute { name, value } => {
                self.attributes.insert((*name).to_string(), value.clone());
            }
            Mutation::SetAlt(a) => self.alt = a.clone(),
            Mutation::SetVisible(v) => self.visible = *v,
            Mutation::AddClass(c) => {
                self.classes.insert(*c);
            }
            Mutation::RemoveClass(c) => {
                self.classes.remove(c);
            }
        }
        self.log.push(mutation);
    }
}

/// Headless page used for pre-rendering and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualDocument {
    pub elements: Vec<VirtualElement>,
    pub lang: Option<LocaleTag>,
    pub data_lang: Option<LocaleTag>,
    pub meta_description: String,
    pub title_key: Option<String>,
    pub title: String,
    pub theme: Option<String>,
    pub open_menus: BTreeSet<Menu>,
}

impl VirtualDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element and return its index.
    pub fn push(&mut self, element: VirtualElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn with_title_key(mut self, key: &str) -> Self {
        self.title_key = Some(key.to_string());
        self
    }

    pub fn element(&self, index: usize) -> Option<&VirtualElement> {
        self.elements.get(index)
    }

    /// Total number of element mutations applied so far.
    pub fn mutation_count(&self) -> usize {
        self.elements.iter().map(|e| e.log.len()).sum()
    }

    pub fn is_menu_open(&self, menu: Menu) -> bool {
        self.open_menus.contains(&menu)
    }
}

impl Document for VirtualDocument {
    type Target = VirtualElement;

    fn targets(&self) -> &[VirtualElement] {
        &self.elements
    }

    fn targets_mut(&mut self) -> &mut [VirtualElement] {
        &mut self.elements
    }

    fn set_language(&mut self, locale: LocaleTag) {
        self.lang = Some(locale);
        self.data_lang = Some(locale);
    }

    fn set_meta_description(&mut self, text: &str) {
        self.meta_description = text.to_string();
    }

    fn title_key(&self) -> Option<&str> {
        self.title_key.as_deref()
    }

    fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
    }

    fn set_theme(&mut self, theme: &str) {
        self.theme = Some(theme.to_string());
    }

    fn set_menu_open(&mut self, menu: Menu, open: bool) {
        if open {
            self.open_menus.insert(menu);
        } else {
            self.open_menus.remove(&menu);
        }
    }
}
