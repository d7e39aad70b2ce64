use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use tracing::warn;

static I18N_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/i18n");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    fn file_name(&self) -> String {
        format!("{self}.json")
    }
}

/// Flat key → string table with a French fallback
#[derive(Debug, Clone, Default)]
pub struct Translations {
    locale: Locale,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translations {
    pub fn load(locale: Locale) -> Self {
        let fallback = embedded(Locale::default()).unwrap_or_default();
        let strings = if locale == Locale::default() {
            None
        } else {
            embedded(locale)
        };

        match strings {
            Some(strings) => Self {
                locale,
                strings,
                fallback,
            },
            None => {
                if locale != Locale::default() {
                    warn!(%locale, "translations unavailable, falling back to French");
                }
                Self {
                    locale: Locale::default(),
                    strings: fallback.clone(),
                    fallback,
                }
            }
        }
    }

    pub fn from_tables(
        locale: Locale,
        strings: HashMap<String, String>,
        fallback: HashMap<String, String>,
    ) -> Self {
        Self {
            locale,
            strings,
            fallback,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look `key` up and replace every `{name}` with its value. Missing keys
    /// fall back to French, then to the key itself.
    pub fn lookup(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let template = self
            .strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(key);

        substitutions
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key, &[])
    }
}

fn embedded(locale: Locale) -> Option<HashMap<String, String>> {
    let file = I18N_DIR.get_file(locale.file_name())?;
    let text = file.contents_utf8()?;
    match serde_json::from_str(text) {
        Ok(table) => Some(table),
        Err(err) => {
            warn!(%locale, error = %err, "malformed translation table");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn embedded_tables_share_keys() {
        let fr = embedded(Locale::Fr).unwrap();
        let en = embedded(Locale::En).unwrap();
        let mut fr_keys: Vec<&String> = fr.keys().collect();
        let mut en_keys: Vec<&String> = en.keys().collect();
        fr_keys.sort();
        en_keys.sort();
        assert_eq!(fr_keys, en_keys);
    }

    #[test]
    fn french_is_the_default() {
        let t = Translations::load(Locale::Fr);
        assert_eq!(t.locale(), Locale::Fr);
        assert_eq!(t.t("quiz.next"), "Suivant");
        assert_eq!(t.t("quiz.finish"), "Terminer");
    }

    #[test]
    fn english_table_loads() {
        let t = Translations::load(Locale::En);
        assert_eq!(t.locale(), Locale::En);
        assert_eq!(t.t("quiz.next"), "Next");
    }

    #[test]
    fn substitutes_placeholders() {
        let t = Translations::load(Locale::Fr);
        assert_eq!(
            t.lookup("results.final_score", &[("score", "21"), ("total", "28")]),
            "Score Final : 21 / 28"
        );
    }

    #[test]
    fn missing_key_falls_back_to_french_then_key() {
        let t = Translations::from_tables(
            Locale::En,
            table(&[("a", "A")]),
            table(&[("a", "À"), ("b", "Bé")]),
        );
        assert_eq!(t.t("a"), "A");
        assert_eq!(t.t("b"), "Bé");
        assert_eq!(t.t("c"), "c");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let t = Translations::from_tables(Locale::Fr, table(&[("k", "{x} et {y}")]), table(&[]));
        assert_eq!(t.lookup("k", &[("x", "1")]), "1 et {y}");
    }

    #[test]
    fn locale_display_matches_file_names() {
        assert_eq!(Locale::Fr.to_string(), "fr");
        assert_eq!(Locale::En.file_name(), "en.json");
    }
}
