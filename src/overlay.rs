use crate::locale::Language;
use crate::storage::ThemePreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Language,
    Theme,
}

/// The control that requested the overlay; focus returns to it on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    LanguageControl,
    ThemeControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Language(Language),
    Theme(ThemePreference),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption {
    pub choice: Choice,
    pub label: String,
}

/// At most one overlay is ever open; opening a new one replaces whatever was
/// open. The dropdown menus carry only their cursor since their option sets
/// are fixed; the drawer carries its options explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Closed,
    LanguageMenu {
        selected: usize,
        opener: Opener,
    },
    ThemeMenu {
        selected: usize,
        opener: Opener,
    },
    Drawer {
        kind: PickerKind,
        title: String,
        options: Vec<PickerOption>,
        selected: usize,
        opener: Opener,
    },
}

/// What a transition asks the caller to do. Selection hands back a plain data
/// value rather than invoking a captured callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Opened,
    Dismissed { opener: Opener },
    Selected { choice: Choice, opener: Opener },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::Closed)
    }

    pub fn open_menu(&mut self, kind: PickerKind, opener: Opener, selected: usize) -> Effect {
        *self = match kind {
            PickerKind::Language => Overlay::LanguageMenu {
                selected: selected.min(Language::ALL.len() - 1),
                opener,
            },
            PickerKind::Theme => Overlay::ThemeMenu {
                selected: selected.min(ThemePreference::ALL.len() - 1),
                opener,
            },
        };
        Effect::Opened
    }

    pub fn open_drawer(
        &mut self,
        kind: PickerKind,
        opener: Opener,
        title: String,
        options: Vec<PickerOption>,
        selected: usize,
    ) -> Effect {
        if options.is_empty() {
            log::debug!("drawer for {kind:?} has no options; ignoring open request");
            return Effect::None;
        }
        let selected = selected.min(options.len() - 1);
        *self = Overlay::Drawer {
            kind,
            title,
            options,
            selected,
            opener,
        };
        Effect::Opened
    }

    pub fn dismiss(&mut self) -> Effect {
        match std::mem::replace(self, Overlay::Closed) {
            Overlay::Closed => Effect::None,
            Overlay::LanguageMenu { opener, .. }
            | Overlay::ThemeMenu { opener, .. }
            | Overlay::Drawer { opener, .. } => Effect::Dismissed { opener },
        }
    }

    pub fn select_focused(&mut self) -> Effect {
        match std::mem::replace(self, Overlay::Closed) {
            Overlay::Closed => Effect::None,
            Overlay::LanguageMenu { selected, opener } => Effect::Selected {
                choice: Choice::Language(Language::ALL[selected]),
                opener,
            },
            Overlay::ThemeMenu { selected, opener } => Effect::Selected {
                choice: Choice::Theme(ThemePreference::ALL[selected]),
                opener,
            },
            Overlay::Drawer {
                options,
                selected,
                opener,
                ..
            } => Effect::Selected {
                choice: options[selected].choice,
                opener,
            },
        }
    }

    pub fn focus_next(&mut self) {
        self.step(1);
    }

    pub fn focus_prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        let count = self.option_count();
        if count == 0 {
            return;
        }
        if let Some(selected) = self.selected_mut() {
            let next = (*selected as isize + delta).rem_euclid(count as isize);
            *selected = next as usize;
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            Overlay::Closed => 0,
            Overlay::LanguageMenu { .. } => Language::ALL.len(),
            Overlay::ThemeMenu { .. } => ThemePreference::ALL.len(),
            Overlay::Drawer { options, .. } => options.len(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self {
            Overlay::Closed => None,
            Overlay::LanguageMenu { selected, .. }
            | Overlay::ThemeMenu { selected, .. }
            | Overlay::Drawer { selected, .. } => Some(*selected),
        }
    }

    fn selected_mut(&mut self) -> Option<&mut usize> {
        match self {
            Overlay::Closed => None,
            Overlay::LanguageMenu { selected, .. }
            | Overlay::ThemeMenu { selected, .. }
            | Overlay::Drawer { selected, .. } => Some(selected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawer_options() -> Vec<PickerOption> {
        ThemePreference::ALL
            .iter()
            .map(|theme| PickerOption {
                choice: Choice::Theme(*theme),
                label: format!("{theme:?}"),
            })
            .collect()
    }

    #[test]
    fn opening_one_menu_closes_the_other() {
        let mut overlay = Overlay::Closed;
        overlay.open_menu(PickerKind::Language, Opener::LanguageControl, 0);
        assert!(matches!(overlay, Overlay::LanguageMenu { .. }));

        overlay.open_menu(PickerKind::Theme, Opener::ThemeControl, 0);
        assert!(matches!(overlay, Overlay::ThemeMenu { .. }));
    }

    #[test]
    fn dismissal_restores_focus_to_the_opener() {
        let mut overlay = Overlay::Closed;
        overlay.open_menu(PickerKind::Theme, Opener::ThemeControl, 1);
        let effect = overlay.dismiss();
        assert_eq!(
            effect,
            Effect::Dismissed {
                opener: Opener::ThemeControl
            }
        );
        assert!(!overlay.is_open());
    }

    #[test]
    fn selection_reports_the_choice_and_closes() {
        let mut overlay = Overlay::Closed;
        overlay.open_menu(PickerKind::Language, Opener::LanguageControl, 2);
        let effect = overlay.select_focused();
        assert_eq!(
            effect,
            Effect::Selected {
                choice: Choice::Language(Language::ALL[2]),
                opener: Opener::LanguageControl,
            }
        );
        assert!(!overlay.is_open());
    }

    #[test]
    fn focus_cycles_with_wraparound() {
        let mut overlay = Overlay::Closed;
        overlay.open_menu(PickerKind::Language, Opener::LanguageControl, 0);

        overlay.focus_prev();
        assert_eq!(overlay.selected(), Some(Language::ALL.len() - 1));

        overlay.focus_next();
        assert_eq!(overlay.selected(), Some(0));
    }

    #[test]
    fn drawer_selection_uses_the_carried_options() {
        let mut overlay = Overlay::Closed;
        overlay.open_drawer(
            PickerKind::Theme,
            Opener::ThemeControl,
            "Theme".to_string(),
            drawer_options(),
            0,
        );
        overlay.focus_next();
        let effect = overlay.select_focused();
        assert_eq!(
            effect,
            Effect::Selected {
                choice: Choice::Theme(ThemePreference::Light),
                opener: Opener::ThemeControl,
            }
        );
    }

    #[test]
    fn empty_drawer_is_a_no_op() {
        let mut overlay = Overlay::Closed;
        let effect = overlay.open_drawer(
            PickerKind::Language,
            Opener::LanguageControl,
            "Language".to_string(),
            Vec::new(),
            0,
        );
        assert_eq!(effect, Effect::None);
        assert!(!overlay.is_open());
    }

    #[test]
    fn selecting_while_closed_does_nothing() {
        let mut overlay = Overlay::Closed;
        assert_eq!(overlay.select_focused(), Effect::None);
        assert_eq!(overlay.dismiss(), Effect::None);
    }
}
