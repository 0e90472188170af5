use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

use arboard::Clipboard;

use crate::corpus::Corpus;
use crate::dates;
use crate::locale::{self, Fragment, Language, Piece, Resolved, StringKey};
use crate::overlay::{Choice, Effect, Opener, Overlay, PickerKind, PickerOption};
use crate::storage::{self, PrefStore, ThemePreference, NARROW_BREAKPOINT};

const LONG_TEXT_CHARS: usize = 150;
const FADE_WINDOW: Duration = Duration::from_millis(400);
const TOAST_TTL: Duration = Duration::from_secs(2);

/// Injected time source; index math never reads the wall clock directly.
pub type Clock = fn() -> NaiveDate;

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Everything the display sink needs for one frame. Fully derived; rebuilt on
/// every render.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub quote_text: String,
    pub source_line: Vec<Piece>,
    pub formatted_date: String,
    pub day_of_year: u32,
    pub day_index: usize,
    pub is_long_text: bool,
}

pub struct AppConfig {
    pub locale_tags: Vec<String>,
    pub viewport_width: u16,
    pub system_prefers_dark: bool,
    pub initial_offset: i64,
    pub debug_panel: bool,
}

pub struct App {
    pub should_quit: bool,
    pub language: Language,
    pub theme: ThemePreference,
    pub minimalist: bool,
    pub current_date_offset: i64,
    pub overlay: Overlay,
    pub focus: Option<Opener>,
    pub show_help: bool,
    pub view: ViewModel,
    pub announcement: Option<String>,
    pub debug_panel: bool,
    corpus: Corpus,
    prefs: PrefStore,
    clock: Clock,
    viewport_width: u16,
    system_prefers_dark: bool,
    transition: Option<Instant>,
    toast: Option<Toast>,
}

impl App {
    pub fn new(corpus: Corpus, prefs: PrefStore, config: AppConfig, clock: Clock) -> Self {
        let preferences =
            storage::load_preferences(&prefs, &config.locale_tags, config.viewport_width);

        let mut app = App {
            should_quit: false,
            language: preferences.language,
            theme: preferences.theme,
            minimalist: preferences.minimalist,
            current_date_offset: 0,
            overlay: Overlay::Closed,
            focus: None,
            show_help: false,
            view: ViewModel::default(),
            announcement: None,
            debug_panel: config.debug_panel,
            corpus,
            prefs,
            clock,
            viewport_width: config.viewport_width,
            system_prefers_dark: config.system_prefers_dark,
            transition: None,
            toast: None,
        };
        app.render(config.initial_offset, true);
        app
    }

    /// Move the in-session day cursor and rebuild the view model. Navigation
    /// and language changes arm a cross-fade; the initial load shows content
    /// immediately.
    pub fn render(&mut self, offset_delta: i64, is_initial_load: bool) {
        self.current_date_offset += offset_delta;
        let date = dates::date_with_offset((self.clock)(), self.current_date_offset);
        let index = dates::quote_index(date, self.corpus.len());
        let quote = self.corpus.quote_at(index);

        let quote_text = locale::quote_text_for(quote, self.language).to_string();
        let source_line = locale::format_source(
            self.language,
            Fragment::new(quote.source.clone(), quote.url.clone()),
            Fragment::new(quote.author.clone(), quote.author_url.clone()),
        );

        self.view = ViewModel {
            is_long_text: quote_text.chars().count() > LONG_TEXT_CHARS,
            quote_text,
            source_line,
            formatted_date: locale::format_date(self.language, date),
            day_of_year: dates::day_of_year(date),
            day_index: index,
        };
        self.transition = if is_initial_load {
            None
        } else {
            Some(Instant::now())
        };
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.overlay.is_open() {
            self.handle_overlay_input(key);
            return;
        }
        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => self.render(-1, false),
            KeyCode::Right => self.render(1, false),
            KeyCode::Char('t') => {
                if self.current_date_offset != 0 {
                    let delta = -self.current_date_offset;
                    self.render(delta, false);
                }
            }
            KeyCode::Char('l') => self.open_picker(PickerKind::Language),
            KeyCode::Char('s') => self.open_picker(PickerKind::Theme),
            KeyCode::Char('m') => self.toggle_minimalist(),
            KeyCode::Char('e') => self.export_quote(),
            KeyCode::Char('h') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_overlay_input(&mut self, key: KeyEvent) {
        let effect = match key.code {
            KeyCode::Esc => self.overlay.dismiss(),
            KeyCode::Tab | KeyCode::Down => {
                self.overlay.focus_next();
                Effect::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.overlay.focus_prev();
                Effect::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.overlay.select_focused(),
            KeyCode::Char('q') => {
                self.should_quit = true;
                Effect::None
            }
            _ => Effect::None,
        };
        self.apply_effect(effect);
    }

    fn open_picker(&mut self, kind: PickerKind) {
        let opener = match kind {
            PickerKind::Language => Opener::LanguageControl,
            PickerKind::Theme => Opener::ThemeControl,
        };
        let selected = match kind {
            PickerKind::Language => Language::ALL
                .iter()
                .position(|lang| *lang == self.language)
                .unwrap_or(0),
            PickerKind::Theme => ThemePreference::ALL
                .iter()
                .position(|theme| *theme == self.theme)
                .unwrap_or(0),
        };

        let effect = if self.viewport_width <= NARROW_BREAKPOINT {
            let title = match kind {
                PickerKind::Language => self.tr(StringKey::LanguagePicker),
                PickerKind::Theme => self.tr(StringKey::ThemePicker),
            }
            .to_string();
            let options = self.picker_options(kind);
            self.overlay.open_drawer(kind, opener, title, options, selected)
        } else {
            self.overlay.open_menu(kind, opener, selected)
        };
        self.apply_effect(effect);
    }

    /// Option lists for the fixed pickers, labelled for the current language.
    pub fn picker_options(&self, kind: PickerKind) -> Vec<PickerOption> {
        match kind {
            PickerKind::Language => Language::ALL
                .iter()
                .map(|lang| PickerOption {
                    choice: Choice::Language(*lang),
                    label: lang.native_name().to_string(),
                })
                .collect(),
            PickerKind::Theme => ThemePreference::ALL
                .iter()
                .map(|theme| PickerOption {
                    choice: Choice::Theme(*theme),
                    label: self.theme_label(*theme).to_string(),
                })
                .collect(),
        }
    }

    pub fn theme_label(&self, theme: ThemePreference) -> &'static str {
        match theme {
            ThemePreference::System => self.tr(StringKey::ThemeSystem),
            ThemePreference::Light => self.tr(StringKey::ThemeLight),
            ThemePreference::Dark => self.tr(StringKey::ThemeDark),
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Opened => self.announce(StringKey::DialogOpened),
            Effect::Dismissed { opener } => {
                self.focus = Some(opener);
                self.announce(StringKey::DialogClosed);
            }
            Effect::Selected { choice, opener } => {
                self.focus = Some(opener);
                self.apply_choice(choice);
                self.announce(StringKey::DialogClosed);
            }
            Effect::None => {}
        }
    }

    fn apply_choice(&mut self, choice: Choice) {
        match choice {
            Choice::Language(language) => {
                if let Err(err) = self.prefs.write_language(language) {
                    log::warn!("failed to persist language: {err}");
                }
                if language != self.language {
                    self.language = language;
                    self.render(0, false);
                }
            }
            Choice::Theme(theme) => {
                if let Err(err) = self.prefs.write_theme(theme) {
                    log::warn!("failed to persist theme: {err}");
                }
                self.theme = theme;
            }
        }
    }

    fn toggle_minimalist(&mut self) {
        self.minimalist = !self.minimalist;
        if let Err(err) = self.prefs.write_minimalist(self.minimalist) {
            log::warn!("failed to persist minimalist mode: {err}");
        }
        let key = if self.minimalist {
            StringKey::MinimalistOn
        } else {
            StringKey::MinimalistOff
        };
        let message = self.tr(key).to_string();
        self.set_toast(message, false);
    }

    fn export_quote(&mut self) {
        let card = self.format_quote_card();
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(card)) {
            Ok(_) => {
                let message = self.tr(StringKey::ExportDone).to_string();
                self.set_toast(message, false);
            }
            Err(err) => {
                log::warn!("clipboard export failed: {err}");
                let message = self.tr(StringKey::ExportFailed).to_string();
                self.set_toast(message, true);
            }
        }
    }

    pub fn format_quote_card(&self) -> String {
        format!(
            "“{}”\n{}\n{}",
            self.view.quote_text,
            locale::plain_text(&self.view.source_line),
            self.view.formatted_date
        )
    }

    /// Resolved translation; the fallback tag is only surfaced to diagnostics.
    pub fn tr(&self, key: StringKey) -> &'static str {
        match locale::string_for(self.language, key) {
            Resolved::Found(value) => value,
            Resolved::MissingFallback(value) => {
                log::debug!("missing {:?} translation for {key:?}", self.language);
                value
            }
        }
    }

    pub fn prefers_dark(&self) -> bool {
        match self.theme {
            ThemePreference::System => self.system_prefers_dark,
            ThemePreference::Light => false,
            ThemePreference::Dark => true,
        }
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
    }

    pub fn is_narrow(&self) -> bool {
        self.viewport_width <= NARROW_BREAKPOINT
    }

    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    pub fn fade_active(&mut self) -> bool {
        match self.transition {
            Some(started) if started.elapsed() < FADE_WINDOW => true,
            Some(_) => {
                self.transition = None;
                false
            }
            None => false,
        }
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > TOAST_TTL {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }

    fn announce(&mut self, key: StringKey) {
        self.announcement = Some(self.tr(key).to_string());
    }
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    // Feb 16, 2026 is day 47 of a non-leap year.
    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 16).unwrap()
    }

    fn quote(id: u64, text: &str) -> Quote {
        Quote {
            id,
            text: text.to_string(),
            text_ko: None,
            text_ja: None,
            text_es: None,
            source: format!("Source {id}"),
            author: format!("Author {id}"),
            url: None,
            author_url: None,
        }
    }

    fn three_quote_corpus() -> Corpus {
        let mut second = quote(1, "second");
        second.text_ko = Some("두 번째".to_string());
        Corpus::from_records(vec![quote(0, "first"), second, quote(2, "third")]).unwrap()
    }

    fn app_with(corpus: Corpus, dir: &TempDir, viewport_width: u16) -> App {
        let prefs = PrefStore::at(dir.path().join("prefs.json"));
        prefs.write_language(Language::En).unwrap();
        App::new(
            corpus,
            prefs,
            AppConfig {
                locale_tags: Vec::new(),
                viewport_width,
                system_prefers_dark: true,
                initial_offset: 0,
                debug_panel: false,
            },
            fixed_today,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn day_47_renders_slot_two_then_wraps_forward() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);

        assert_eq!(app.view.day_of_year, 47);
        assert_eq!(app.view.day_index, 2);
        assert_eq!(app.view.quote_text, "third");

        app.render(1, false);
        assert_eq!(app.view.day_of_year, 48);
        assert_eq!(app.view.day_index, 0);
        assert_eq!(app.view.quote_text, "first");
    }

    #[test]
    fn navigation_round_trips_to_the_same_quote() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        let original_offset = app.current_date_offset;
        let original_text = app.view.quote_text.clone();

        app.handle_key_event(key(KeyCode::Right));
        assert_ne!(app.view.quote_text, original_text);

        app.handle_key_event(key(KeyCode::Left));
        assert_eq!(app.current_date_offset, original_offset);
        assert_eq!(app.view.quote_text, original_text);
    }

    #[test]
    fn initial_load_shows_content_without_a_fade() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        assert!(!app.fade_active());

        app.handle_key_event(key(KeyCode::Right));
        assert!(app.fade_active());
    }

    #[test]
    fn wide_viewport_opens_a_menu_and_dismissal_restores_focus() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);

        app.handle_key_event(key(KeyCode::Char('l')));
        assert!(matches!(app.overlay, Overlay::LanguageMenu { .. }));
        assert_eq!(app.announcement.as_deref(), Some("Dialog opened"));

        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.overlay.is_open());
        assert_eq!(app.focus, Some(Opener::LanguageControl));
        assert_eq!(app.announcement.as_deref(), Some("Dialog closed"));
    }

    #[test]
    fn narrow_viewport_opens_a_drawer_instead() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 640);

        app.handle_key_event(key(KeyCode::Char('s')));
        assert!(matches!(
            app.overlay,
            Overlay::Drawer {
                kind: PickerKind::Theme,
                ..
            }
        ));
    }

    #[test]
    fn selecting_a_language_persists_and_rerenders_localized_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        // Move the cursor to yesterday's slot so the quote has a ko override.
        app.render(-1, false);
        assert_eq!(app.view.quote_text, "second");

        app.handle_key_event(key(KeyCode::Char('l')));
        app.handle_key_event(key(KeyCode::Tab)); // En -> Ko
        app.handle_key_event(key(KeyCode::Enter));

        assert_eq!(app.language, Language::Ko);
        assert_eq!(app.view.quote_text, "두 번째");
        assert!(!app.overlay.is_open());
        assert_eq!(app.focus, Some(Opener::LanguageControl));

        let prefs = PrefStore::at(dir.path().join("prefs.json"));
        assert_eq!(prefs.read_language(), Some(Language::Ko));
    }

    #[test]
    fn selecting_a_theme_persists_without_touching_the_view() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        let text_before = app.view.quote_text.clone();

        app.handle_key_event(key(KeyCode::Char('s')));
        app.handle_key_event(key(KeyCode::Tab)); // System -> Light
        app.handle_key_event(key(KeyCode::Char(' ')));

        assert_eq!(app.theme, ThemePreference::Light);
        assert!(!app.prefers_dark());
        assert_eq!(app.view.quote_text, text_before);
        assert!(!app.fade_active());

        let prefs = PrefStore::at(dir.path().join("prefs.json"));
        assert_eq!(prefs.read_theme(), Some(ThemePreference::Light));
    }

    #[test]
    fn system_theme_follows_the_ambient_signal() {
        let dir = TempDir::new().unwrap();
        let app = app_with(three_quote_corpus(), &dir, 1280);
        assert_eq!(app.theme, ThemePreference::System);
        assert!(app.prefers_dark());
    }

    #[test]
    fn minimalist_toggle_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        assert!(!app.minimalist);

        app.handle_key_event(key(KeyCode::Char('m')));
        assert!(app.minimalist);

        let prefs = PrefStore::at(dir.path().join("prefs.json"));
        assert_eq!(prefs.read_minimalist(), Some(true));
    }

    #[test]
    fn fallback_corpus_always_renders_its_single_quote() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(Corpus::fallback(), &dir, 1280);
        assert_eq!(app.view.day_index, 0);
        assert!(app.view.quote_text.starts_with("Learn how to learn"));

        app.render(5, false);
        assert_eq!(app.view.day_index, 0);
    }

    #[test]
    fn long_quotes_set_the_dense_layout_flag() {
        let dir = TempDir::new().unwrap();
        let long_text = "a".repeat(151);
        let corpus = Corpus::from_records(vec![quote(0, &long_text)]).unwrap();
        let app = app_with(corpus, &dir, 1280);
        assert!(app.view.is_long_text);
    }

    #[test]
    fn source_line_composes_in_english_word_order() {
        let dir = TempDir::new().unwrap();
        let app = app_with(three_quote_corpus(), &dir, 1280);
        let line = locale::plain_text(&app.view.source_line);
        assert_eq!(line, "from Source 2 by Author 2");
    }

    #[test]
    fn today_key_returns_to_offset_zero() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(three_quote_corpus(), &dir, 1280);
        app.handle_key_event(key(KeyCode::Right));
        app.handle_key_event(key(KeyCode::Right));
        assert_eq!(app.current_date_offset, 2);

        app.handle_key_event(key(KeyCode::Char('t')));
        assert_eq!(app.current_date_offset, 0);
        assert_eq!(app.view.day_index, 2);
    }
}
