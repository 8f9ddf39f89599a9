use std::time::Duration;

use reqwest::{Client, header};

use crate::{
    Error, Result,
    config::OpenAiConfig,
    types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ChatClient {
    config: OpenAiConfig,
    client: Client,
}

impl ChatClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::UpstreamUnavailable(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends one chat completion and returns the first choice's content.
    pub async fn complete(&self, messages: Vec<ChatMessage>, temperature: f32) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "chat API returned {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("not a chat completion ({e})"), body.clone()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::malformed("chat completion has no message content", body))
    }
}
