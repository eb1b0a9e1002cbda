//! Open/closed state of the header drop-downs.
//!
//! At most one menu is open at a time. Escape, a click outside, or picking an
//! option closes everything.

use crate::locale::LocaleTag;
use crate::render::{Document, Menu};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    ToggleLanguage,
    ToggleTheme,
    SelectLanguage(LocaleTag),
    SelectTheme(Theme),
    Escape,
    OutsideClick,
}

/// What the page should do after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    ChangeLanguage(LocaleTag),
    ChangeTheme(Theme),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menus {
    open: Option<Menu>,
}

impl Menus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Option<Menu> {
        self.open
    }

    pub fn is_open(&self, menu: Menu) -> bool {
        self.open == Some(menu)
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }

    fn toggle(&mut self, menu: Menu) {
        let was_open = self.is_open(menu);
        self.close_all();
        if !was_open {
            self.open = Some(menu);
        }
    }

    pub fn handle(&mut self, event: MenuEvent) -> Option<MenuAction> {
        match event {
            MenuEvent::ToggleLanguage => {
                self.toggle(Menu::Language);
                None
            }
            MenuEvent::ToggleTheme => {
                self.toggle(Menu::Theme);
                None
            }
            MenuEvent::SelectLanguage(tag) => {
                self.close_all();
                Some(MenuAction::ChangeLanguage(tag))
            }
            MenuEvent::SelectTheme(theme) => {
                self.close_all();
                Some(MenuAction::ChangeTheme(theme))
            }
            MenuEvent::Escape | MenuEvent::OutsideClick => {
                self.close_all();
                None
            }
        }
    }

    /// Mirror the state onto the page's menus and their buttons.
    pub fn apply<D: Document>(&self, doc: &mut D) {
        for menu in [Menu::Language, Menu::Theme] {
            doc.set_menu_open(menu, self.is_open(menu));
        }
    }
}
