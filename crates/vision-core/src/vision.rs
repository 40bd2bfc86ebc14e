//! Generated Vision Structure
//!
//! The structured result of one generation call: what a concept looks like
//! roughly ten years out. Provider output is JSON-ish at best, so parsing
//! is tolerant: code fences are stripped, missing fields get defaults, and
//! an unparseable payload degrades to a structure built from the raw text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Year the prompts steer the generator toward
pub const TARGET_YEAR: i32 = 2036;

/// Cap on raw text carried into a fallback summary, in characters
const FALLBACK_SUMMARY_CHARS: usize = 500;

/// One titled narrative block within a vision
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A generated future vision for a concept
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vision {
    /// Headline, e.g. "The Future of iPhone"
    pub title: String,

    /// Year the narrative describes
    pub year: i32,

    /// Short overview of the transformation
    pub summary: String,

    /// Named narrative sections (technology, experience, society, wildcard)
    pub sections: BTreeMap<String, Section>,

    /// The most important predicted changes
    pub key_changes: Vec<String>,
}

/// Loose mirror of [`Vision`] for provider output, where any field may be
/// missing or omitted
#[derive(Debug, Deserialize)]
struct RawVision {
    title: Option<String>,
    year: Option<i32>,
    summary: Option<String>,
    sections: Option<BTreeMap<String, RawSection>>,
    key_changes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    title: Option<String>,
    content: Option<String>,
}

impl Vision {
    /// Default headline for a concept
    pub fn default_title(concept: &str) -> String {
        format!("The Future of {}", concept)
    }

    /// Parse a provider reply into a vision.
    ///
    /// Strips markdown code fences, fills missing fields with defaults, and
    /// degrades to [`Vision::fallback`] when the payload is not JSON at all.
    pub fn from_reply(concept: &str, content: &str) -> Self {
        let block = extract_json_block(content);
        match serde_json::from_str::<RawVision>(block.trim()) {
            Ok(raw) => Self {
                title: raw.title.unwrap_or_else(|| Self::default_title(concept)),
                year: raw.year.unwrap_or(TARGET_YEAR),
                summary: raw.summary.unwrap_or_default(),
                sections: raw
                    .sections
                    .map(|sections| {
                        sections
                            .into_iter()
                            .map(|(key, raw)| {
                                let section = Section {
                                    title: raw.title.unwrap_or_default(),
                                    content: raw.content.unwrap_or_default(),
                                };
                                (key, section)
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                key_changes: raw.key_changes.unwrap_or_default(),
            },
            Err(err) => {
                tracing::debug!(error = %err, "structured parse failed, using raw-text fallback");
                Self::fallback(concept, block)
            }
        }
    }

    /// Best-effort vision built from raw text when structured parsing fails.
    ///
    /// The full text lands in the technology section and the summary is
    /// capped on a char boundary, so multi-byte replies stay intact.
    pub fn fallback(concept: &str, raw: &str) -> Self {
        let mut sections = BTreeMap::new();
        sections.insert(
            "technology".to_string(),
            Section::new("Technology", raw),
        );
        sections.insert("experience".to_string(), Section::new("Experience", ""));
        sections.insert("society".to_string(), Section::new("Society", ""));
        sections.insert("wildcard".to_string(), Section::new("Wildcard", ""));

        Self {
            title: Self::default_title(concept),
            year: TARGET_YEAR,
            summary: raw.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
            sections,
            key_changes: Vec::new(),
        }
    }
}

/// Pull the JSON payload out of a reply that may wrap it in code fences
fn extract_json_block(content: &str) -> &str {
    if let Some((_, rest)) = content.split_once("```json") {
        rest.split_once("```").map_or(rest, |(inner, _)| inner)
    } else if let Some((_, rest)) = content.split_once("```") {
        rest.split_once("```").map_or(rest, |(inner, _)| inner)
    } else {
        content
    }
}
