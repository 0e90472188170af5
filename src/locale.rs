use chrono::{Locale as ChronoLocale, NaiveDate};

use crate::models::Quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ko,
    Ja,
    Es,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Ko, Language::Ja, Language::Es];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
            Language::Ja => "ja",
            Language::Es => "es",
        }
    }

    /// Parse a bare language code. Regional tags must be reduced to their
    /// primary subtag before calling this; unsupported codes yield `None`
    /// and callers substitute English.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| code.eq_ignore_ascii_case(lang.code()))
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ko => "한국어",
            Language::Ja => "日本語",
            Language::Es => "Español",
        }
    }

    pub fn date_locale(self) -> &'static str {
        bundle(self).date_locale
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKey {
    QuoteOfTheDay,
    LanguagePicker,
    ThemePicker,
    ThemeSystem,
    ThemeLight,
    ThemeDark,
    Minimalist,
    MinimalistOn,
    MinimalistOff,
    Export,
    ExportDone,
    ExportFailed,
    DialogOpened,
    DialogClosed,
    PrevDay,
    NextDay,
    Today,
    Help,
    Quit,
}

impl StringKey {
    pub const ALL: [StringKey; 19] = [
        StringKey::QuoteOfTheDay,
        StringKey::LanguagePicker,
        StringKey::ThemePicker,
        StringKey::ThemeSystem,
        StringKey::ThemeLight,
        StringKey::ThemeDark,
        StringKey::Minimalist,
        StringKey::MinimalistOn,
        StringKey::MinimalistOff,
        StringKey::Export,
        StringKey::ExportDone,
        StringKey::ExportFailed,
        StringKey::DialogOpened,
        StringKey::DialogClosed,
        StringKey::PrevDay,
        StringKey::NextDay,
        StringKey::Today,
        StringKey::Help,
        StringKey::Quit,
    ];
}

/// Lookup outcome. A translation that had to borrow the English value keeps
/// that fact in the type so diagnostics can report it without string sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Found(&'static str),
    MissingFallback(&'static str),
}

impl Resolved {
    pub fn text(self) -> &'static str {
        match self {
            Resolved::Found(value) | Resolved::MissingFallback(value) => value,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Resolved::MissingFallback(_))
    }
}

pub fn string_for(language: Language, key: StringKey) -> Resolved {
    match (bundle(language).lookup)(key) {
        Some(value) => Resolved::Found(value),
        None => Resolved::MissingFallback(english(key)),
    }
}

/// Localized quote text when an override exists and is non-blank, else the
/// default text. No fallback chain beyond those two.
pub fn quote_text_for(quote: &Quote, language: Language) -> &str {
    let localized = match language {
        Language::En => None,
        Language::Ko => quote.text_ko.as_deref(),
        Language::Ja => quote.text_ja.as_deref(),
        Language::Es => quote.text_es.as_deref(),
    };
    match localized {
        Some(text) if !text.trim().is_empty() => text,
        _ => &quote.text,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub url: Option<String>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Plain(String),
    Link(Fragment),
}

impl Piece {
    fn plain(text: &str) -> Self {
        Piece::Plain(text.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            Piece::Plain(text) => text,
            Piece::Link(fragment) => &fragment.text,
        }
    }
}

pub fn plain_text(pieces: &[Piece]) -> String {
    pieces.iter().map(Piece::text).collect()
}

/// Compose the attribution phrase in the word order of the language.
pub fn format_source(language: Language, source: Fragment, author: Fragment) -> Vec<Piece> {
    (bundle(language).source_format)(source, author)
}

pub fn format_date(language: Language, date: NaiveDate) -> String {
    let bundle = bundle(language);
    date.format_localized(bundle.date_format, bundle.chrono_locale)
        .to_string()
}

/// First supported language among an ordered list of locale tags, matching on
/// the primary subtag only ("es_MX.UTF-8" counts as "es").
pub fn detect_language(tags: &[String]) -> Option<Language> {
    tags.iter()
        .filter_map(|tag| Language::from_code(primary_subtag(tag)))
        .next()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_', '.', '@']).next().unwrap_or("")
}

struct Bundle {
    date_locale: &'static str,
    chrono_locale: ChronoLocale,
    date_format: &'static str,
    lookup: fn(StringKey) -> Option<&'static str>,
    source_format: fn(Fragment, Fragment) -> Vec<Piece>,
}

fn bundle(language: Language) -> &'static Bundle {
    match language {
        Language::En => &EN,
        Language::Ko => &KO,
        Language::Ja => &JA,
        Language::Es => &ES,
    }
}

static EN: Bundle = Bundle {
    date_locale: "en-US",
    chrono_locale: ChronoLocale::en_US,
    date_format: "%B %-d, %Y",
    lookup: english_lookup,
    source_format: source_en,
};

static KO: Bundle = Bundle {
    date_locale: "ko-KR",
    chrono_locale: ChronoLocale::ko_KR,
    date_format: "%Y년 %-m월 %-d일",
    lookup: korean,
    source_format: source_ko,
};

static JA: Bundle = Bundle {
    date_locale: "ja-JP",
    chrono_locale: ChronoLocale::ja_JP,
    date_format: "%Y年%-m月%-d日",
    lookup: japanese,
    source_format: source_ja,
};

static ES: Bundle = Bundle {
    date_locale: "es-ES",
    chrono_locale: ChronoLocale::es_ES,
    date_format: "%-d de %B de %Y",
    lookup: spanish,
    source_format: source_es,
};

fn english_lookup(key: StringKey) -> Option<&'static str> {
    Some(english(key))
}

// English is the designated fallback and must stay total over StringKey.
fn english(key: StringKey) -> &'static str {
    match key {
        StringKey::QuoteOfTheDay => "Quote of the day",
        StringKey::LanguagePicker => "Language",
        StringKey::ThemePicker => "Theme",
        StringKey::ThemeSystem => "System",
        StringKey::ThemeLight => "Light",
        StringKey::ThemeDark => "Dark",
        StringKey::Minimalist => "Minimalist mode",
        StringKey::MinimalistOn => "Minimalist mode on",
        StringKey::MinimalistOff => "Minimalist mode off",
        StringKey::Export => "Copy quote",
        StringKey::ExportDone => "Quote copied to clipboard",
        StringKey::ExportFailed => "Could not copy quote",
        StringKey::DialogOpened => "Dialog opened",
        StringKey::DialogClosed => "Dialog closed",
        StringKey::PrevDay => "Previous day",
        StringKey::NextDay => "Next day",
        StringKey::Today => "Today",
        StringKey::Help => "Help",
        StringKey::Quit => "Quit",
    }
}

fn korean(key: StringKey) -> Option<&'static str> {
    let value = match key {
        StringKey::QuoteOfTheDay => "오늘의 인용구",
        StringKey::LanguagePicker => "언어",
        StringKey::ThemePicker => "테마",
        StringKey::ThemeSystem => "시스템",
        StringKey::ThemeLight => "라이트",
        StringKey::ThemeDark => "다크",
        StringKey::Minimalist => "미니멀 모드",
        StringKey::MinimalistOn => "미니멀 모드 켬",
        StringKey::MinimalistOff => "미니멀 모드 끔",
        StringKey::Export => "인용구 복사",
        StringKey::ExportDone => "클립보드에 복사했습니다",
        StringKey::ExportFailed => "복사하지 못했습니다",
        StringKey::DialogOpened => "대화상자가 열렸습니다",
        StringKey::DialogClosed => "대화상자가 닫혔습니다",
        StringKey::PrevDay => "이전 날",
        StringKey::NextDay => "다음 날",
        StringKey::Today => "오늘",
        StringKey::Help => "도움말",
        StringKey::Quit => "종료",
    };
    Some(value)
}

fn japanese(key: StringKey) -> Option<&'static str> {
    let value = match key {
        StringKey::QuoteOfTheDay => "今日の引用",
        StringKey::LanguagePicker => "言語",
        StringKey::ThemePicker => "テーマ",
        StringKey::ThemeSystem => "システム",
        StringKey::ThemeLight => "ライト",
        StringKey::ThemeDark => "ダーク",
        StringKey::Minimalist => "ミニマルモード",
        StringKey::MinimalistOn => "ミニマルモード オン",
        StringKey::MinimalistOff => "ミニマルモード オフ",
        StringKey::Export => "引用をコピー",
        StringKey::ExportDone => "クリップボードにコピーしました",
        // TODO: ja translation for the copy-failure toast.
        StringKey::ExportFailed => return None,
        StringKey::DialogOpened => "ダイアログが開きました",
        StringKey::DialogClosed => "ダイアログが閉じました",
        StringKey::PrevDay => "前の日",
        StringKey::NextDay => "次の日",
        StringKey::Today => "今日",
        StringKey::Help => "ヘルプ",
        StringKey::Quit => "終了",
    };
    Some(value)
}

fn spanish(key: StringKey) -> Option<&'static str> {
    let value = match key {
        StringKey::QuoteOfTheDay => "Cita del día",
        StringKey::LanguagePicker => "Idioma",
        StringKey::ThemePicker => "Tema",
        StringKey::ThemeSystem => "Sistema",
        StringKey::ThemeLight => "Claro",
        StringKey::ThemeDark => "Oscuro",
        StringKey::Minimalist => "Modo minimalista",
        StringKey::MinimalistOn => "Modo minimalista activado",
        StringKey::MinimalistOff => "Modo minimalista desactivado",
        StringKey::Export => "Copiar cita",
        StringKey::ExportDone => "Cita copiada al portapapeles",
        StringKey::ExportFailed => "No se pudo copiar la cita",
        StringKey::DialogOpened | StringKey::DialogClosed => return None,
        StringKey::PrevDay => "Día anterior",
        StringKey::NextDay => "Día siguiente",
        StringKey::Today => "Hoy",
        StringKey::Help => "Ayuda",
        StringKey::Quit => "Salir",
    };
    Some(value)
}

fn source_en(source: Fragment, author: Fragment) -> Vec<Piece> {
    vec![
        Piece::plain("from "),
        Piece::Link(source),
        Piece::plain(" by "),
        Piece::Link(author),
    ]
}

fn source_ko(source: Fragment, author: Fragment) -> Vec<Piece> {
    vec![
        Piece::Link(source),
        Piece::plain(", "),
        Piece::Link(author),
        Piece::plain(" 저"),
    ]
}

fn source_ja(source: Fragment, author: Fragment) -> Vec<Piece> {
    vec![
        Piece::plain("『"),
        Piece::Link(source),
        Piece::plain("』より "),
        Piece::Link(author),
    ]
}

fn source_es(source: Fragment, author: Fragment) -> Vec<Piece> {
    vec![
        Piece::plain("de "),
        Piece::Link(source),
        Piece::plain(" por "),
        Piece::Link(author),
    ]
}
