use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::api::Translator;
use crate::error::CodeswitchError;

/// API version header required by the Messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    host: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
    client: Client,
}

/// Model info for the list-models subcommand.
#[derive(Debug)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Option<Vec<ContentBlock>>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    data: Option<Vec<ModelEntry>>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: Option<String>,
    display_name: Option<String>,
}

impl AnthropicClient {
    pub fn new(
        host: String,
        api_key: SecretString,
        model: String,
        max_tokens: u32,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::new();
        Self {
            host,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout_secs,
            client,
        }
    }

    fn base_url(&self) -> String {
        format!("https://{}/v1", self.host)
    }

    fn map_http_error(status: u16, detail: Option<String>) -> CodeswitchError {
        let detail = detail.unwrap_or_else(|| "no detail provided".to_string());
        match status {
            401 => CodeswitchError::Auth {
                message: "invalid or expired API key".to_string(),
            },
            403 => CodeswitchError::Auth {
                message: "API key lacks permission for this request".to_string(),
            },
            404 => CodeswitchError::Config {
                message: format!("model or endpoint not found: {detail}"),
            },
            429 => CodeswitchError::Api {
                message: format!("rate limited: {detail}"),
            },
            529 => CodeswitchError::Api {
                message: format!("API overloaded: {detail}"),
            },
            _ => CodeswitchError::Api {
                message: format!("HTTP {status}: {detail}"),
            },
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> CodeswitchError {
        if e.is_timeout() {
            CodeswitchError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            CodeswitchError::Connection {
                message: format!("failed to reach API: {}", e),
            }
        }
    }

    /// Pull the server-provided error message out of a non-2xx body, if any.
    async fn error_detail(resp: reqwest::Response) -> Option<String> {
        let body = resp.text().await.ok()?;
        parse_error_detail(&body)
    }
}

/// Parse an error body into a detail string. Structured
/// `{"error": {"message": ...}}` bodies yield the message; anything else
/// (proxies, gateways) falls back to the raw body text.
fn parse_error_detail(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body)
        && let Some(detail) = parsed.error
        && let Some(message) = detail.message
    {
        return Some(message);
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Translator for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, CodeswitchError> {
        let url = format!("{}/messages", self.base_url());

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status_code = resp.status();
        if !status_code.is_success() {
            let detail = Self::error_detail(resp).await;
            return Err(Self::map_http_error(status_code.as_u16(), detail));
        }

        let response: MessagesResponse = resp.json().await.map_err(|e| CodeswitchError::Api {
            message: format!("failed to parse response: {}", e),
        })?;

        let text = response
            .content
            .unwrap_or_default()
            .into_iter()
            .filter(|block| block.block_type.as_deref() == Some("text"))
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(CodeswitchError::Response {
                message: "reply contained no text content".to_string(),
            });
        }

        Ok(text)
    }
}

/// List the models available to the given API key.
pub async fn list_models(
    host: &str,
    api_key: &SecretString,
) -> Result<Vec<ModelInfo>, CodeswitchError> {
    let client = Client::new();
    let url = format!("https://{}/v1/models", host);

    let resp = client
        .get(&url)
        .header("x-api-key", api_key.expose_secret())
        .header("anthropic-version", ANTHROPIC_VERSION)
        .send()
        .await
        .map_err(|e| CodeswitchError::Connection {
            message: format!("failed to list models: {}", e),
        })?;

    let status_code = resp.status();
    if !status_code.is_success() {
        let detail = AnthropicClient::error_detail(resp).await;
        return Err(AnthropicClient::map_http_error(
            status_code.as_u16(),
            detail,
        ));
    }

    let response: ModelListResponse = resp.json().await.map_err(|e| CodeswitchError::Api {
        message: format!("failed to parse model list: {}", e),
    })?;

    Ok(response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|m| ModelInfo {
            id: m.id.unwrap_or_default(),
            display_name: m.display_name.unwrap_or_default(),
        })
        .collect())
}
