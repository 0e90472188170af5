use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::locale::{self, Language};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::System,
        ThemePreference::Light,
        ThemePreference::Dark,
    ];
}

/// Viewports at or below this width (pixel units, see `main::viewport_width`)
/// get the drawer presentation and the first-run minimalist default.
pub const NARROW_BREAKPOINT: u16 = 640;

/// Effective preferences after first-run resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub theme: ThemePreference,
    pub minimalist: bool,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct PrefFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<ThemePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimalist: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PrefStore {
    path: Option<PathBuf>,
}

impl PrefStore {
    pub fn open_default() -> Self {
        let path = dirs::home_dir().map(|mut path| {
            path.push(".quotetab.json");
            path
        });
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn read_language(&self) -> Option<Language> {
        let code = self.read_file()?.language?;
        // A stored but unsupported code degrades to English rather than
        // triggering detection again.
        Some(Language::from_code(&code).unwrap_or(Language::En))
    }

    pub fn write_language(&self, language: Language) -> Result<(), io::Error> {
        let mut file = self.read_file().unwrap_or_default();
        file.language = Some(language.code().to_string());
        self.write_file(&file)
    }

    pub fn read_theme(&self) -> Option<ThemePreference> {
        self.read_file()?.theme
    }

    pub fn write_theme(&self, theme: ThemePreference) -> Result<(), io::Error> {
        let mut file = self.read_file().unwrap_or_default();
        file.theme = Some(theme);
        self.write_file(&file)
    }

    pub fn read_minimalist(&self) -> Option<bool> {
        self.read_file()?.minimalist
    }

    pub fn write_minimalist(&self, value: bool) -> Result<(), io::Error> {
        let mut file = self.read_file().unwrap_or_default();
        file.minimalist = Some(value);
        self.write_file(&file)
    }

    fn read_file(&self) -> Option<PrefFile> {
        let path = self.path.as_ref()?;
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    fn write_file(&self, file: &PrefFile) -> Result<(), io::Error> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
        let json = serde_json::to_string_pretty(file)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        fs::write(path, json)
    }
}

/// Resolve effective preferences, applying the one-time first-run rules:
/// language is detected from the locale tags and persisted, minimalist mode
/// defaults from the viewport width and is persisted, theme defaults to
/// `system` without persisting.
pub fn load_preferences(
    store: &PrefStore,
    locale_tags: &[String],
    viewport_width: u16,
) -> Preferences {
    let language = match store.read_language() {
        Some(language) => language,
        None => {
            let detected = locale::detect_language(locale_tags).unwrap_or(Language::En);
            if let Err(err) = store.write_language(detected) {
                log::warn!("failed to persist detected language: {err}");
            }
            detected
        }
    };

    let theme = store.read_theme().unwrap_or(ThemePreference::System);

    let minimalist = match store.read_minimalist() {
        Some(value) => value,
        None => {
            let narrow = viewport_width <= NARROW_BREAKPOINT;
            if let Err(err) = store.write_minimalist(narrow) {
                log::warn!("failed to persist minimalist default: {err}");
            }
            narrow
        }
    };

    Preferences {
        language,
        theme,
        minimalist,
    }
}

/// Ordered locale tags from the environment, most specific first. The
/// colon-separated LANGUAGE list outranks the single-valued variables.
pub fn preferred_locale_tags() -> Vec<String> {
    let mut tags = Vec::new();
    if let Ok(value) = env::var("LANGUAGE") {
        tags.extend(
            value
                .split(':')
                .filter(|tag| !tag.trim().is_empty())
                .map(str::to_string),
        );
    }
    for name in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = env::var(name) {
            if !value.trim().is_empty() {
                tags.push(value);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> PrefStore {
        PrefStore::at(dir.path().join("prefs.json"))
    }

    #[test]
    fn reads_are_none_when_nothing_is_stored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.read_language(), None);
        assert_eq!(store.read_theme(), None);
        assert_eq!(store.read_minimalist(), None);
    }

    #[test]
    fn fields_persist_independently() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.write_theme(ThemePreference::Dark).unwrap();
        store.write_language(Language::Ja).unwrap();
        assert_eq!(store.read_theme(), Some(ThemePreference::Dark));
        assert_eq!(store.read_language(), Some(Language::Ja));

        store.write_minimalist(true).unwrap();
        assert_eq!(store.read_theme(), Some(ThemePreference::Dark));
        assert_eq!(store.read_minimalist(), Some(true));
    }

    #[test]
    fn unsupported_stored_code_degrades_to_english() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            dir.path().join("prefs.json"),
            r#"{ "language": "fr" }"#,
        )
        .unwrap();
        assert_eq!(store.read_language(), Some(Language::En));
    }

    #[test]
    fn first_run_detects_language_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let tags = vec!["ko_KR.UTF-8".to_string()];
        let prefs = load_preferences(&store, &tags, 1280);
        assert_eq!(prefs.language, Language::Ko);
        assert_eq!(store.read_language(), Some(Language::Ko));

        // A different environment later does not rerun detection.
        let other_tags = vec!["es_ES.UTF-8".to_string()];
        let prefs = load_preferences(&store, &other_tags, 1280);
        assert_eq!(prefs.language, Language::Ko);
    }

    #[test]
    fn detection_defaults_to_english_without_a_match() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let prefs = load_preferences(&store, &["C".to_string()], 1280);
        assert_eq!(prefs.language, Language::En);
        assert_eq!(store.read_language(), Some(Language::En));
    }

    #[test]
    fn narrow_first_run_persists_minimalist_on() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let prefs = load_preferences(&store, &[], 640);
        assert!(prefs.minimalist);
        assert_eq!(store.read_minimalist(), Some(true));

        // Widening the viewport later does not revisit the decision.
        let prefs = load_preferences(&store, &[], 1920);
        assert!(prefs.minimalist);
    }

    #[test]
    fn wide_first_run_persists_minimalist_off() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let prefs = load_preferences(&store, &[], 641);
        assert!(!prefs.minimalist);
        assert_eq!(store.read_minimalist(), Some(false));
    }

    #[test]
    fn theme_defaults_to_system_without_persisting() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let prefs = load_preferences(&store, &[], 1280);
        assert_eq!(prefs.theme, ThemePreference::System);
        assert_eq!(store.read_theme(), None);
    }
}
