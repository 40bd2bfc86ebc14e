//! Supported Response Languages
//!
//! The request schema validates against this fixed set; each language maps
//! to an instruction the system prompt embeds verbatim.

use serde::{Deserialize, Serialize};

use crate::error::VisionError;

/// Language the generated vision is written in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// Chinese
    Zh,
    /// Japanese
    Ja,
    /// German
    De,
    /// French
    Fr,
    /// Korean
    Ko,
    /// Spanish
    Es,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Zh,
        Language::Ja,
        Language::De,
        Language::Fr,
        Language::Ko,
        Language::Es,
    ];

    /// Wire-format language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Ko => "ko",
            Language::Es => "es",
        }
    }

    /// Response-language instruction embedded in the system prompt
    pub fn instruction(&self) -> &'static str {
        match self {
            Language::En => "Respond in English.",
            Language::Zh => "用中文回答。",
            Language::Ja => "日本語で回答してください。",
            Language::De => "Antworte auf Deutsch.",
            Language::Fr => "Répondez en français.",
            Language::Ko => "한국어로 답변해 주세요.",
            Language::Es => "Responde en español.",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = VisionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            "ja" => Ok(Language::Ja),
            "de" => Ok(Language::De),
            "fr" => Ok(Language::Fr),
            "ko" => Ok(Language::Ko),
            "es" => Ok(Language::Es),
            other => Err(VisionError::UnsupportedLanguage(other.to_string())),
        }
    }
}
