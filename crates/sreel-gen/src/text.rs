//! Text generation client (OpenAI-compatible chat completions).
//!
//! Produces narration scripts and per-scene image prompts.

use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use sreel_models::DurationPlan;

use crate::error::{GenError, GenResult};

/// Chat completions client.
#[derive(Clone)]
pub struct TextClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// One candidate narration script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryVariant {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl TextClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn complete(&self, prompt: &str, temperature: f64) -> GenResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens: 800,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenError::from_status(status, body));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| GenError::missing_output("chat completion had no choices"))
    }

    /// Generate candidate narration scripts in parallel.
    ///
    /// Each variant uses a slightly higher temperature so the candidates
    /// differ in tone. Failed variants are dropped; at least one must
    /// succeed.
    pub async fn story_variants(
        &self,
        description: &str,
        plan: &DurationPlan,
        count: usize,
    ) -> GenResult<Vec<StoryVariant>> {
        info!(count, words = plan.estimated_words, "generating story variants");
        let prompt = story_prompt(description, plan);

        let futures: Vec<_> = (0..count)
            .map(|i| {
                let temperature = 0.9 + 0.1 * i as f64;
                let prompt = prompt.clone();
                async move {
                    let text = self.complete(&prompt, temperature).await?;
                    Ok::<_, GenError>(StoryVariant { index: i, text })
                }
            })
            .collect();

        let mut variants = Vec::new();
        for result in join_all(futures).await {
            match result {
                Ok(variant) => variants.push(variant),
                Err(e) => warn!("story variant failed: {}", e),
            }
        }

        if variants.is_empty() {
            return Err(GenError::missing_output("all story variants failed"));
        }
        Ok(variants)
    }

    /// Rewrite a story according to a user instruction, keeping length.
    pub async fn modify_story(
        &self,
        story: &str,
        instruction: &str,
        plan: &DurationPlan,
    ) -> GenResult<String> {
        let prompt = format!(
            "Rewrite the following narration script according to this instruction: \
             {instruction}\n\nKeep it to roughly {words} words so it fits \
             {seconds} seconds of narration. Return only the rewritten script, \
             no commentary.\n\nSCRIPT:\n{story}",
            words = plan.estimated_words,
            seconds = plan.total_seconds,
        );
        self.complete(&prompt, 0.8).await
    }

    /// Generate one visual scene prompt per video segment.
    pub async fn scene_prompts(
        &self,
        story: &str,
        segment_count: u32,
        style: &str,
    ) -> GenResult<Vec<String>> {
        let language_hint = if contains_cyrillic(story) {
            "The story is in a Cyrillic-script language; still write the \
             scene prompts in English."
        } else {
            ""
        };
        let prompt = format!(
            "Split this story into exactly {segment_count} consecutive visual \
             scenes. For each scene write one image generation prompt in the \
             style: {style}. Describe concrete subjects, setting, lighting and \
             camera angle. {language_hint}\n\
             Return ONLY a JSON array of {segment_count} strings.\n\n\
             STORY:\n{story}"
        );

        let raw = self.complete(&prompt, 0.7).await?;
        let mut prompts = parse_prompt_array(&raw)?;
        let expected = segment_count as usize;
        if prompts.len() > expected {
            debug!(
                expected,
                got = prompts.len(),
                "model returned extra scene prompts, truncating"
            );
            prompts.truncate(expected);
        }
        if prompts.len() < expected {
            // Surfaced as a parse error so the caller's retry kicks in.
            return Err(GenError::parse(format!(
                "expected {expected} scene prompts, got {}",
                prompts.len()
            )));
        }
        Ok(prompts)
    }
}

fn story_prompt(description: &str, plan: &DurationPlan) -> String {
    let language_hint = if contains_cyrillic(description) {
        "Write the story in the same language as the description."
    } else {
        "Write the story in English."
    };
    format!(
        "Write a short narration script for a {seconds}-second video based on \
         this description: {description}\n\n\
         The script must be roughly {words} words (spoken at a natural pace). \
         {language_hint} It should hook the viewer in the first sentence and \
         end with a memorable closing line. Return only the script text, no \
         titles or stage directions.",
        seconds = plan.total_seconds,
        words = plan.estimated_words,
    )
}

/// Whether text contains Cyrillic characters.
pub fn contains_cyrillic(text: &str) -> bool {
    text.chars()
        .any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
}

/// Parse a JSON array of strings, tolerating markdown code fences.
fn parse_prompt_array(raw: &str) -> GenResult<Vec<String>> {
    let text = raw.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    let text = text.trim();

    let value: Value = serde_json::from_str(text)
        .map_err(|e| GenError::parse(format!("scene prompts are not valid JSON: {e}")))?;
    let array = value
        .as_array()
        .ok_or_else(|| GenError::parse("scene prompts are not a JSON array"))?;

    array
        .iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| GenError::parse("scene prompt array contains a non-string"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TextClient {
        TextClient::new(Client::new(), server.uri(), "test-key", "test/model")
    }

    #[test]
    fn detects_cyrillic() {
        assert!(contains_cyrillic("история о коте"));
        assert!(!contains_cyrillic("a story about a cat"));
    }

    #[test]
    fn parses_plain_json_array() {
        let raw = r#"["a cat on a roof", "a cat jumping"]"#;
        let prompts = parse_prompt_array(raw).unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], "a cat on a roof");
    }

    #[test]
    fn parses_fenced_json_array() {
        let raw = "```json\n[\"scene one\", \"scene two\"]\n```";
        let prompts = parse_prompt_array(raw).unwrap();
        assert_eq!(prompts, vec!["scene one", "scene two"]);
    }

    #[test]
    fn rejects_non_array_output() {
        assert!(parse_prompt_array("{\"scenes\": []}").is_err());
        assert!(parse_prompt_array("not json at all").is_err());
    }

    #[tokio::test]
    async fn collects_successful_variants() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Once upon a time."}}]
            })))
            .mount(&server)
            .await;

        let plan = DurationPlan::for_duration(20);
        let variants = client(&server)
            .story_variants("a cat", &plan, 3)
            .await
            .unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].text, "Once upon a time.");
    }

    #[tokio::test]
    async fn scene_prompts_truncate_to_segment_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {
                    "content": "[\"one\", \"two\", \"three\", \"four\"]"
                }}]
            })))
            .mount(&server)
            .await;

        let prompts = client(&server)
            .scene_prompts("story", 3, "cinematic")
            .await
            .unwrap();
        assert_eq!(prompts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn too_few_scene_prompts_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "[\"one\"]"}}]
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .scene_prompts("story", 3, "cinematic")
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::Parse(_)));
    }

    #[tokio::test]
    async fn errors_when_all_variants_fail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let plan = DurationPlan::for_duration(20);
        let err = client(&server)
            .story_variants("a cat", &plan, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::MissingOutput(_)));
    }
}
