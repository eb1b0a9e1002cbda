//! The locale switcher: the view-layer controller that owns the active
//! locale, its dictionary, and the schedule of pending text swaps.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::dictionary::Dictionary;
use crate::locale::{detect, LocaleTag};
use crate::menu::{MenuAction, MenuEvent, Menus};
use crate::relative_time::render_commit_stat;
use crate::render::{Binding, Document, Mutation, RenderTarget};
use crate::source::{load_with_fallback, DictionarySource};
use crate::stagger::{
    reading_order, stagger_offsets, Step, Timeline, CHANGED_CLASS, CHANGING_CLASS, STAGGER_STEP,
};
use crate::storage::{KeyValueStore, LANG_KEY};
use crate::theme::{self, Theme};

/// Key refreshed into every `data-i18n-none` element.
pub const STATS_NONE_KEY: &str = "hero.stats_none";

/// Per-page state that used to live in globals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteContext {
    pub locale: LocaleTag,
    pub theme: Theme,
}

pub struct LocaleSwitcher<S, K> {
    source: S,
    store: K,
    context: SiteContext,
    dictionary: Dictionary,
    timeline: Timeline,
    menus: Menus,
}

impl<S: DictionarySource, K: KeyValueStore> LocaleSwitcher<S, K> {
    pub fn new(source: S, store: K) -> Self {
        let theme = theme::current(&store);
        Self {
            source,
            store,
            context: SiteContext {
                locale: LocaleTag::default(),
                theme,
            },
            dictionary: Dictionary::empty(),
            timeline: Timeline::new(),
            menus: Menus::new(),
        }
    }

    pub fn locale(&self) -> LocaleTag {
        self.context.locale
    }

    pub fn context(&self) -> &SiteContext {
        &self.context
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn menus(&self) -> &Menus {
        &self.menus
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn translate(&self, key: &str) -> Option<&str> {
        self.dictionary.lookup(key)
    }

    /// Pick the starting locale from storage or `browser_lang`, load it and
    /// render the page.
    pub async fn init<D: Document>(&mut self, browser_lang: Option<&str>, doc: &mut D) {
        let saved = self.store.get(LANG_KEY);
        self.context.locale = detect(saved.as_deref(), browser_lang);
        info!("Initializing with locale {}", self.context.locale);
        self.load(self.context.locale).await;
        self.update_page(doc);
        self.update_language_button(doc);
        theme::apply(doc, &self.context.theme);
        self.menus.apply(doc);
    }

    async fn load(&mut self, locale: LocaleTag) {
        if let Some((loaded, dictionary)) = load_with_fallback(&self.source, locale).await {
            if loaded != locale {
                warn!("Showing {loaded} translations for {locale}");
            }
            self.dictionary = dictionary;
        }
    }

    /// Switch to `target`. Returns `false` without fetching or touching the
    /// page when `target` is already active.
    pub async fn change_language<D: Document>(&mut self, target: LocaleTag, doc: &mut D) -> bool {
        debug!("change_language called: {target}, current: {}", self.context.locale);
        if target == self.context.locale {
            debug!("Same language, skipping");
            return false;
        }
        self.load(target).await;
        self.context.locale = target;
        if let Err(e) = self.store.set(LANG_KEY, target.as_str()) {
            warn!("failed to persist language: {e}");
        }
        self.update_page(doc);
        self.update_language_button(doc);
        info!("Language changed to: {target}");
        true
    }

    /// Feed a header menu interaction through the menu state machine and
    /// carry out any resulting selection.
    pub async fn handle_menu_event<D: Document>(&mut self, event: MenuEvent, doc: &mut D) {
        match self.menus.handle(event) {
            Some(MenuAction::ChangeLanguage(tag)) => {
                self.change_language(tag, doc).await;
            }
            Some(MenuAction::ChangeTheme(selected)) => {
                theme::set(&mut self.store, doc, &selected);
                self.context.theme = selected;
            }
            None => {}
        }
        self.menus.apply(doc);
    }

    pub fn update_page<D: Document>(&mut self, doc: &mut D) {
        self.update_page_at(doc, Utc::now());
    }

    /// Re-render every tagged element for the active locale. `now` anchors
    /// relative commit times.
    ///
    /// Text elements are only scheduled here; they change as the timeline
    /// is ticked. Everything else is updated immediately.
    pub fn update_page_at<D: Document>(&mut self, doc: &mut D, now: DateTime<Utc>) {
        let locale = self.context.locale;
        debug!("update_page called, locale: {locale}");

        doc.set_language(locale);
        if let Some(description) = self.dictionary.meta_description() {
            doc.set_meta_description(description);
        }
        if let Some(key) = doc.title_key().map(str::to_owned) {
            if let Some(title) = self.dictionary.lookup(&key) {
                doc.set_title(title);
            }
        }

        self.schedule_text_swaps(doc);

        for target in doc.targets_mut() {
            let mutations: Vec<Mutation> = target
                .bindings()
                .iter()
                .filter_map(|binding| self.immediate_mutation(binding, now))
                .collect();
            for mutation in mutations {
                target.apply(mutation);
            }
        }
    }

    fn schedule_text_swaps<D: Document>(&mut self, doc: &mut D) {
        for index in self.timeline.begin_generation() {
            if let Some(target) = doc.target_mut(index) {
                target.apply(Mutation::RemoveClass(CHANGING_CLASS));
                target.apply(Mutation::RemoveClass(CHANGED_CLASS));
            }
        }

        let (indices, rects): (Vec<usize>, Vec<_>) = doc
            .targets()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.text_key().is_some())
            .map(|(i, t)| (i, t.bounds()))
            .unzip();
        debug!("Found {} elements to translate", indices.len());

        let offsets = stagger_offsets(indices.len(), STAGGER_STEP);
        for (order, offset) in reading_order(&rects).into_iter().zip(offsets) {
            self.timeline.schedule_swap(indices[order], offset);
        }
    }

    fn immediate_mutation(&self, binding: &Binding, now: DateTime<Utc>) -> Option<Mutation> {
        match binding {
            Binding::Html(key) => self.lookup_or_warn(key).map(Mutation::SetHtml),
            Binding::Placeholder(key) => self.lookup_or_warn(key).map(Mutation::SetPlaceholder),
            Binding::AriaLabel(key) => {
                self.lookup_or_warn(key)
                    .map(|value| Mutation::SetAttribute {
                        name: "aria-label",
                        value,
                    })
            }
            Binding::Alt(key) => self.lookup_or_warn(key).map(Mutation::SetAlt),
            Binding::LocaleOnly(tag) => Some(Mutation::SetVisible(
                tag.as_str() == self.context.locale.as_str(),
            )),
            Binding::NoneMarker => self.lookup_or_warn(STATS_NONE_KEY).map(Mutation::SetText),
            Binding::CommitStat(Some(info)) => Some(Mutation::SetHtml(render_commit_stat(
                info,
                now,
                self.context.locale,
            ))),
            Binding::Text(_)
            | Binding::CommitStat(None)
            | Binding::CurrentLanguage
            | Binding::LanguageOption(_)
            | Binding::ThemeOption(_) => None,
        }
    }

    fn lookup_or_warn(&self, key: &str) -> Option<String> {
        let found = self.dictionary.lookup(key).map(str::to_owned);
        if found.is_none() {
            warn!("No translation found for key: {key}");
        }
        found
    }

    /// Label the language button with the active locale's name and mark its
    /// menu entry active.
    pub fn update_language_button<D: Document>(&self, doc: &mut D) {
        let locale = self.context.locale;
        for target in doc.targets_mut() {
            let mutations: Vec<Mutation> = target
                .bindings()
                .iter()
                .filter_map(|binding| match binding {
                    Binding::CurrentLanguage => {
                        Some(Mutation::SetText(locale.display_name().to_string()))
                    }
                    Binding::LanguageOption(tag) if *tag == locale => {
                        Some(Mutation::AddClass("active"))
                    }
                    Binding::LanguageOption(_) => Some(Mutation::RemoveClass("active")),
                    _ => None,
                })
                .collect();
            for mutation in mutations {
                target.apply(mutation);
            }
        }
    }

    /// Advance the swap schedule by `dt` and apply whatever came due.
    pub fn tick<D: Document>(&mut self, dt: Duration, doc: &mut D) {
        for due in self.timeline.advance(dt) {
            let Some(target) = doc.target_mut(due.target) else {
                continue;
            };
            match due.step {
                Step::FadeOut => target.apply(Mutation::AddClass(CHANGING_CLASS)),
                Step::Swap => {
                    if let Some(key) = target.text_key().map(str::to_owned) {
                        if let Some(text) = self.lookup_or_warn(&key) {
                            target.apply(Mutation::SetText(text));
                        }
                    }
                    target.apply(Mutation::RemoveClass(CHANGING_CLASS));
                    target.apply(Mutation::AddClass(CHANGED_CLASS));
                }
                Step::Cleanup => target.apply(Mutation::RemoveClass(CHANGED_CLASS)),
            }
        }
    }

    /// Sleep through the pending schedule until every swap has run.
    pub async fn settle<D: Document>(&mut self, doc: &mut D) {
        while let Some(wait) = self.timeline.next_due() {
            tokio::time::sleep(wait).await;
            self.tick(wait, doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{VirtualDocument, VirtualElement};
    use crate::source::MemorySource;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use tracing_test::traced_test;

    fn source() -> MemorySource {
        MemorySource::new()
            .with(
                LocaleTag::ZhCn,
                Dictionary::from_value(LocaleTag::ZhCn, json!({ "hero": { "title": "月" } }))
                    .unwrap(),
            )
            .with(
                LocaleTag::EnUs,
                Dictionary::from_value(LocaleTag::EnUs, json!({ "hero": { "title": "Moon" } }))
                    .unwrap(),
            )
    }

    #[tokio::test]
    async fn text_swaps_only_when_ticked() {
        let mut doc = VirtualDocument::new();
        let title = doc.push(VirtualElement::new(Binding::Text("hero.title".into())).with_text("-"));
        let mut switcher = LocaleSwitcher::new(source(), MemoryStore::new());
        switcher.init(Some("en-US"), &mut doc).await;
        assert_eq!(switcher.translate("hero.title"), Some("Moon"));
        assert_eq!(doc.elements[title].text, "-");

        switcher.tick(Duration::ZERO, &mut doc);
        assert!(doc.elements[title].has_class(CHANGING_CLASS));
        switcher.tick(Duration::from_millis(200), &mut doc);
        assert_eq!(doc.elements[title].text, "Moon");
        assert!(doc.elements[title].has_class(CHANGED_CLASS));
        switcher.tick(Duration::from_millis(300), &mut doc);
        assert!(!doc.elements[title].has_class(CHANGED_CLASS));
        assert!(switcher.timeline().is_idle());
    }

    #[tokio::test]
    async fn new_change_cancels_pending_swaps() {
        let mut doc = VirtualDocument::new();
        let title = doc.push(VirtualElement::new(Binding::Text("hero.title".into())));
        let mut switcher = LocaleSwitcher::new(source(), MemoryStore::new());
        switcher.init(None, &mut doc).await;
        switcher.tick(Duration::from_millis(10), &mut doc);
        assert!(doc.elements[title].has_class(CHANGING_CLASS));

        assert!(switcher.change_language(LocaleTag::EnUs, &mut doc).await);
        assert!(!doc.elements[title].has_class(CHANGING_CLASS));
        assert_eq!(switcher.timeline().pending(), 3);

        switcher.tick(Duration::from_secs(1), &mut doc);
        assert_eq!(doc.elements[title].text, "Moon");
        assert!(!doc.elements[title]
            .log
            .contains(&Mutation::SetText("月".into())));
    }

    #[tokio::test]
    #[traced_test]
    async fn menu_selection_changes_language_and_theme() {
        let mut doc = VirtualDocument::new();
        let label = doc.push(VirtualElement::new(Binding::CurrentLanguage));
        let mut switcher = LocaleSwitcher::new(source(), MemoryStore::new());
        switcher.init(None, &mut doc).await;
        assert_eq!(doc.elements[label].text, "简体中文");

        switcher.handle_menu_event(MenuEvent::ToggleLanguage, &mut doc).await;
        assert!(doc.is_menu_open(crate::render::Menu::Language));
        switcher
            .handle_menu_event(MenuEvent::SelectLanguage(LocaleTag::EnUs), &mut doc)
            .await;
        assert!(doc.open_menus.is_empty());
        assert_eq!(doc.elements[label].text, "English");
        assert_eq!(switcher.store().get(LANG_KEY).as_deref(), Some("en-US"));

        switcher
            .handle_menu_event(MenuEvent::SelectTheme(Theme::new("dark")), &mut doc)
            .await;
        assert_eq!(switcher.context().theme, Theme::default());
        assert!(logs_contain("Language changed to: en-US"));
    }
}
