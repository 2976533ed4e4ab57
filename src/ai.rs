use crate::classifier::KeywordClassifier;
use crate::config::AiSettings;
use crate::error::{Error, Result};
use crate::types::{DecisionSource, RelevanceDecision};
use serde::{Deserialize, Serialize};

/// Character budget for record content inside the prompt
const PROMPT_CONTENT_LIMIT: usize = 1000;

const FALLBACK_EXPLANATION: &str = "AI analysis failed, falling back to keywords";

/// Relevance classifier backed by a remote text-completion service.
///
/// Every failure mode of the remote call — connect error, timeout, non-2xx
/// status, malformed or empty body — degrades to the keyword classifier on
/// the same inputs. The caller always gets a decision.
pub struct AiClassifier {
    client: reqwest::Client,
    settings: AiSettings,
    keyword: KeywordClassifier,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl AiClassifier {
    pub fn new(settings: AiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            settings,
            keyword: KeywordClassifier::new()?,
        })
    }

    /// Classify one record, falling back to keywords on any service failure
    pub async fn classify(&self, title: &str, content: &str) -> RelevanceDecision {
        match self.request_verdict(title, content).await {
            Ok(response) => {
                let (relevant, explanation) = parse_verdict(&response);
                RelevanceDecision {
                    relevant,
                    explanation,
                    source: DecisionSource::Ai,
                }
            }
            Err(e) => {
                eprintln!("✗ AI analysis failed ({}), falling back to keywords", e);
                let keyword_decision = self.keyword.decide(title, content);
                RelevanceDecision {
                    relevant: keyword_decision.relevant,
                    explanation: FALLBACK_EXPLANATION.to_string(),
                    source: DecisionSource::AiFallbackKeyword,
                }
            }
        }
    }

    async fn request_verdict(&self, title: &str, content: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(title, content),
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let mut builder = self.client.post(&self.settings.endpoint).json(&request);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service(format!(
                "completion endpoint returned {}",
                status
            )));
        }

        let body: ChatResponse = response.json().await?;
        let text = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::Service("empty completion response".to_string()));
        }
        Ok(text)
    }
}

/// Bounded prompt: content truncated to a fixed character budget with an
/// ellipsis marker when cut
fn build_prompt(title: &str, content: &str) -> String {
    let mut bounded: String = content.chars().take(PROMPT_CONTENT_LIMIT).collect();
    if content.chars().count() > PROMPT_CONTENT_LIMIT {
        bounded.push_str("...");
    }
    format!(
        "Is this news article about job creation, business expansion, or economic \
         development in a local community? Answer strictly \"Yes\" or \"No\" followed \
         by a one-sentence justification.\n\nTitle: {}\n\nContent: {}",
        title, bounded
    )
}

/// Relevance = response starts with "yes" (case-insensitive); explanation =
/// response with the leading yes/no token stripped
fn parse_verdict(response: &str) -> (bool, String) {
    let trimmed = response.trim();
    let lower = trimmed.to_lowercase();
    let relevant = lower.starts_with("yes");

    let stripped = if relevant {
        &trimmed[3..]
    } else if lower.starts_with("no") {
        &trimmed[2..]
    } else {
        trimmed
    };
    let explanation = stripped
        .trim_start_matches([' ', '.', ',', ':', ';', '-'])
        .trim()
        .to_string();

    (relevant, explanation)
}
