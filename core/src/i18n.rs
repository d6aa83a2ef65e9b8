//! Content languages, locale resolution and localized subjects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language an event can publish its content in.
///
/// Each language occupies one bit of [`crate::Event::locales`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentLanguage {
    /// English
    English,
    /// Italian
    Italian,
    /// German
    German,
    /// Dutch
    Dutch,
    /// French
    French,
    /// Romanian
    Romanian,
    /// Portuguese
    Portuguese,
    /// Turkish
    Turkish,
    /// Spanish
    Spanish,
    /// Polish
    Polish,
    /// Danish
    Danish,
    /// Bulgarian
    Bulgarian,
    /// Swedish
    Swedish,
    /// Czech
    Czech,
}

impl ContentLanguage {
    /// All languages in bit order.
    pub const ALL: [Self; 14] = [
        Self::English,
        Self::Italian,
        Self::German,
        Self::Dutch,
        Self::French,
        Self::Romanian,
        Self::Portuguese,
        Self::Turkish,
        Self::Spanish,
        Self::Polish,
        Self::Danish,
        Self::Bulgarian,
        Self::Swedish,
        Self::Czech,
    ];

    /// Bit assigned to this language in the event locale mask.
    #[must_use]
    pub const fn value(self) -> i32 {
        1 << (self as i32)
    }

    /// ISO 639-1 code.
    #[must_use]
    pub const fn language(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Italian => "it",
            Self::German => "de",
            Self::Dutch => "nl",
            Self::French => "fr",
            Self::Romanian => "ro",
            Self::Portuguese => "pt",
            Self::Turkish => "tr",
            Self::Spanish => "es",
            Self::Polish => "pl",
            Self::Danish => "da",
            Self::Bulgarian => "bg",
            Self::Swedish => "sv",
            Self::Czech => "cs",
        }
    }

    /// Build a locale mask from a list of languages.
    #[must_use]
    pub fn mask(languages: &[Self]) -> i32 {
        languages.iter().fold(0, |acc, l| acc | l.value())
    }

    /// Locale for this language.
    #[must_use]
    pub fn locale(self) -> Locale {
        Locale(self.language().to_string())
    }
}

/// Lower-cased primary language subtag (e.g. `en`, `it`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Parse a language tag such as `en`, `de-CH` or `pt_BR`.
    ///
    /// Returns `None` for blank input or when the primary subtag is not two or
    /// three ASCII letters.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?;
        let valid = (2..=3).contains(&primary.len())
            && primary.chars().all(|c| c.is_ascii_alphabetic());
        valid.then(|| Self(primary.to_ascii_lowercase()))
    }

    /// Primary language subtag.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the content languages enabled for an event.
pub trait LocaleResolver: Send + Sync {
    /// Languages enabled by the given locale mask, in a stable order.
    fn event_locales(&self, configured_locales: i32) -> Vec<ContentLanguage>;
}

/// Resolver that reads [`crate::Event::locales`] as a bitmask.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmaskLocaleResolver;

impl LocaleResolver for BitmaskLocaleResolver {
    fn event_locales(&self, configured_locales: i32) -> Vec<ContentLanguage> {
        ContentLanguage::ALL
            .into_iter()
            .filter(|l| configured_locales & l.value() != 0)
            .collect()
    }
}

/// English when enabled, otherwise the first enabled language.
#[must_use]
pub fn default_language(languages: &[ContentLanguage]) -> Option<ContentLanguage> {
    if languages.contains(&ContentLanguage::English) {
        Some(ContentLanguage::English)
    } else {
        languages.first().copied()
    }
}

/// Explicit assignee language if parseable, otherwise the event default.
#[must_use]
pub fn resolve_locale(requested: Option<&str>, default: ContentLanguage) -> Locale {
    requested
        .and_then(Locale::parse)
        .unwrap_or_else(|| default.locale())
}

/// Localized subject for the "your code" notification.
#[must_use]
pub fn code_email_subject(locale: &Locale, event_display_name: &str) -> String {
    match locale.language() {
        "it" => format!("Il tuo codice per {event_display_name}"),
        "de" => format!("Ihr Code für {event_display_name}"),
        "nl" => format!("Uw code voor {event_display_name}"),
        "fr" => format!("Votre code pour {event_display_name}"),
        "ro" => format!("Codul tău pentru {event_display_name}"),
        "pt" => format!("O seu código para {event_display_name}"),
        "tr" => format!("{event_display_name} için kodunuz"),
        "es" => format!("Tu código para {event_display_name}"),
        "pl" => format!("Twój kod na {event_display_name}"),
        "da" => format!("Din kode til {event_display_name}"),
        "bg" => format!("Вашият код за {event_display_name}"),
        "sv" => format!("Din kod för {event_display_name}"),
        "cs" => format!("Váš kód pro {event_display_name}"),
        _ => format!("Your code for {event_display_name}"),
    }
}
