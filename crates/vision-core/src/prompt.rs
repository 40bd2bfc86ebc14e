//! Prompt Templates
//!
//! Builds the futurist system/user prompt pair sent to the generation
//! provider. The system prompt pins the reply to a single JSON object so
//! downstream parsing stays mechanical.

use crate::language::Language;
use crate::vision::TARGET_YEAR;

/// System prompt: the futurist role, the JSON output contract, and the
/// response-language instruction.
pub fn system_prompt(language: Language) -> String {
    format!(
        r#"You are a futurist and technology analyst with deep expertise in predicting technological evolution.
Your task is to envision what a given product, website, or concept will look like in 10 years (around 2035-2036).

Be creative, imaginative, and grounded in current technological trends. Consider:
- AI integration and automation
- Hardware miniaturization and new form factors
- Social and cultural shifts
- Environmental and sustainability factors
- Economic and business model evolution

{instruction}

Respond in valid JSON format with this structure:
{{
  "title": "A catchy headline about the future of [concept]",
  "year": {year},
  "summary": "A 2-3 sentence overview of the transformation",
  "sections": {{
    "technology": {{
      "title": "Technology Evolution",
      "content": "3-4 paragraphs about technical changes"
    }},
    "experience": {{
      "title": "User Experience",
      "content": "3-4 paragraphs about how people will interact with it"
    }},
    "society": {{
      "title": "Social Impact",
      "content": "3-4 paragraphs about societal implications"
    }},
    "wildcard": {{
      "title": "The Unexpected",
      "content": "1-2 paragraphs with a surprising or unconventional prediction"
    }}
  }},
  "key_changes": ["change 1", "change 2", "change 3", "change 4", "change 5"]
}}"#,
        instruction = language.instruction(),
        year = TARGET_YEAR,
    )
}

/// User prompt asking for a ten-year vision of the concept
pub fn user_prompt(concept: &str) -> String {
    format!(
        "Imagine what '{}' will look like in 10 years. Provide a detailed, creative, and insightful vision of its future evolution.",
        concept
    )
}
