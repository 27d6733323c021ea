//! Narrative assist: remote text generation behind a never-fail boundary.
//!
//! Two calls against a generateContent-style endpoint: describe a drawing
//! snapshot, and continue a story from that description. Failures of any
//! kind — network, non-success status, unparseable body — resolve to fixed
//! kid-friendly fallback strings so the creative flow is never blocked.
//! The drawing core never calls this module; a shell orchestrates
//! export → describe → continue → append.

use serde::{Deserialize, Serialize};

use crate::canvas::snapshot;
use crate::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DESCRIBE_FALLBACK: &str = "a wonderful drawing";
const DESCRIBE_EMPTY: &str = "a colorful masterpiece";
const STORY_FALLBACK: &str = "The magic wand fizzled! Try again later.";
const STORY_EMPTY: &str = "And they lived happily ever after in a world of sparkles!";

/// Client for the narrative endpoint.
#[derive(Debug, Clone)]
pub struct NarrativeAssist {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl NarrativeAssist {
    pub fn new(api_key: impl Into<String>) -> NarrativeAssist {
        NarrativeAssist {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<NarrativeAssist> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY is not set".into()))?;
        Ok(NarrativeAssist::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> NarrativeAssist {
        self.model = model.into();
        self
    }

    /// Point the client at a different endpoint. Tests use this to exercise
    /// the fallback paths against an unreachable address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> NarrativeAssist {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Describe an exported drawing in a few words. Never fails: anything
    /// that goes wrong resolves to a fallback description.
    pub async fn describe_drawing(&self, image_data_uri: &str) -> String {
        let Some(payload) = snapshot::base64_payload(image_data_uri) else {
            return DESCRIBE_FALLBACK.to_string();
        };
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_png(payload),
                    Part::text("Briefly describe what a child drew in this picture in 5-10 words."),
                ],
            }],
        };
        match self.generate(&request).await {
            Ok(text) if text.is_empty() => DESCRIBE_EMPTY.to_string(),
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "describe_drawing fell back");
                DESCRIBE_FALLBACK.to_string()
            }
        }
    }

    /// Continue a story with 2-3 whimsical sentences. Never fails.
    pub async fn continue_story(&self, description: &str, current_story: &str) -> String {
        let prompt = format!(
            "You are a magical storyteller for kids. \
             The child drew: \"{description}\". \
             The current story is: \"{current_story}\". \
             Enhance this story or finish it with 2-3 whimsical, kid-friendly \
             sentences. Keep it under 50 words. Focus on magic, kindness, and \
             fun. Do not repeat the existing story text, just continue it."
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
        };
        match self.generate(&request).await {
            Ok(text) if text.is_empty() => STORY_EMPTY.to_string(),
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "continue_story fell back");
                STORY_FALLBACK.to_string()
            }
        }
    }

    /// The fallible inner call; the public surface maps every error to a
    /// fallback string.
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self.client.post(url).json(request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }
        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.first_text().trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Part {
        Part {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline_png(base64_data: &str) -> Part {
        Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: "image/png".to_string(),
                data: base64_data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connection refused locally; no network involved.
    fn unreachable_assist() -> NarrativeAssist {
        NarrativeAssist::new("test-key").with_base_url("http://127.0.0.1:9")
    }

    #[tokio::test]
    async fn describe_falls_back_when_endpoint_is_unreachable() {
        let assist = unreachable_assist();
        let text = assist
            .describe_drawing("data:image/png;base64,aGVsbG8=")
            .await;
        assert_eq!(text, DESCRIBE_FALLBACK);
    }

    #[tokio::test]
    async fn describe_falls_back_on_non_image_input() {
        let assist = unreachable_assist();
        let text = assist.describe_drawing("https://example.com/cat.png").await;
        assert_eq!(text, DESCRIBE_FALLBACK);
    }

    #[tokio::test]
    async fn story_falls_back_when_endpoint_is_unreachable() {
        let assist = unreachable_assist();
        let text = assist.continue_story("a red dragon", "Once upon a time.").await;
        assert_eq!(text, STORY_FALLBACK);
    }

    #[test]
    fn response_text_extraction() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a happy sun"},{"text":" over a house"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_text(), "a happy sun over a house");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), "");
    }
}
