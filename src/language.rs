use serde::{Deserialize, Serialize};

use crate::Url;

const FLAGS: [(&str, &str); 12] = [
    ("english", "gb"),
    ("spanish", "es"),
    ("french", "fr"),
    ("german", "de"),
    ("hindi", "in"),
    ("japanese", "jp"),
    ("chinese", "cn"),
    ("korean", "kr"),
    ("italian", "it"),
    ("arabic", "sa"),
    ("portuguese", "pt"),
    ("russian", "ru"),
];

/// A language name as the backend stores it, e.g. `"spanish"`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Language(pub String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn flag_code(&self) -> Option<&'static str> {
        let lower = self.0.trim().to_lowercase();
        FLAGS.iter().find(|(name, _)| *name == lower).map(|(_, code)| *code)
    }

    pub fn flag_url(&self) -> Option<Url> {
        self.flag_code()
            .map(|code| Url(String::from("https://flagcdn.com/24x18/") + code + ".png"))
    }

    /// First character upper-cased, the rest untouched.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_lookup_ignores_case() {
        assert_eq!(Language::from("Spanish").flag_code(), Some("es"));
        assert_eq!(Language::from("KOREAN").flag_code(), Some("kr"));
        assert_eq!(
            Language::from("german").flag_url(),
            Some(Url("https://flagcdn.com/24x18/de.png".into()))
        );
    }

    #[test]
    fn unknown_or_empty_language_has_no_flag() {
        assert_eq!(Language::from("klingon").flag_code(), None);
        assert_eq!(Language::default().flag_url(), None);
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(Language::from("japanese").display_name(), "Japanese");
        assert_eq!(Language::default().display_name(), "");
    }
}
