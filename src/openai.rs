//! OpenAI chat-completion client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Model used for every completion.
const MODEL: &str = "gpt-3.5-turbo";

/// Fixed instruction constraining tone and length of the replies.
const SYSTEM_PROMPT: &str = "You are a helpful assistant in a Telegram group chat. \
    Provide concise, helpful answers to questions. Keep responses under 200 words.";

const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f64 = 0.7;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The completion seam: one question in, one answer out.
#[async_trait]
pub trait Completions {
    async fn complete(&self, question: &str) -> Result<String, Error>;
}

pub struct Client {
    api_key: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ApiRequest {
    model: &'static str,
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl Client {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: reqwest::Client::new(),
        }
    }
}

fn request_for(question: &str) -> ApiRequest {
    ApiRequest {
        model: MODEL,
        messages: vec![
            ApiMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ApiMessage {
                role: "user",
                content: question.to_string(),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

#[async_trait]
impl Completions for Client {
    /// One completion attempt; only the first returned choice is used.
    async fn complete(&self, question: &str) -> Result<String, Error> {
        debug!("Requesting completion ({} chars)", question.len());

        let response = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_for(question))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(Error::Empty)
    }
}

#[derive(Debug)]
pub enum Error {
    Http(String),
    Api(String),
    Parse(String),
    Empty,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Api(e) => write!(f, "API error: {e}"),
            Error::Parse(e) => write!(f, "Parse error: {e}"),
            Error::Empty => write!(f, "Empty response"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request =
            serde_json::to_value(request_for("How do I reset my password?")).unwrap();

        assert_eq!(request["model"], "gpt-3.5-turbo");
        assert_eq!(request["max_tokens"], 300);
        assert_eq!(request["temperature"], 0.7);

        let messages = request["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "How do I reset my password?");
    }

    #[test]
    fn test_response_takes_first_choice() {
        let body = r#"{"choices":[
            {"message":{"role":"assistant","content":"first"}},
            {"message":{"role":"assistant","content":"second"}}
        ]}"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap();
        assert_eq!(text, "first");
    }
}
