//! Mock Vision Provider
//!
//! In-process provider for tests and local runs without proxy credentials.
//! Returns a canned vision, or fails every call when flipped into failing
//! mode to exercise the compensating-refund path.

use std::sync::Mutex;

use async_trait::async_trait;

use vision_core::{
    error::{Result, VisionError},
    language::Language,
    provider::VisionProvider,
    vision::{Section, Vision, TARGET_YEAR},
};

/// Mock provider for testing
pub struct MockVisionProvider {
    fail: bool,
    calls: Mutex<Vec<(String, Language)>>,
}

impl Default for MockVisionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVisionProvider {
    /// Provider that answers every generation
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that fails every generation
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Generation calls seen so far
    pub fn calls(&self) -> Vec<(String, Language)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        "MockVision"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    async fn generate(&self, concept: &str, language: Language) -> Result<Vision> {
        if self.fail {
            return Err(VisionError::Provider(
                "mock provider configured to fail".into(),
            ));
        }

        self.calls
            .lock()
            .unwrap()
            .push((concept.to_string(), language));

        let mut vision = Vision::fallback(concept, "");
        vision.summary = format!("A canned ten-year vision of {}.", concept);
        vision.sections.insert(
            "technology".to_string(),
            Section::new(
                "Technology Evolution",
                format!("{} becomes ambient and invisible.", concept),
            ),
        );
        vision.key_changes = vec![
            "everything is ambient".to_string(),
            "nobody notices anymore".to_string(),
        ];
        vision.year = TARGET_YEAR;
        Ok(vision)
    }
}
