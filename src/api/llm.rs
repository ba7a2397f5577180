use serde::{Deserialize, Serialize};
use serde_json::json;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MODEL: &str = "xiaomi/mimo-v2-flash:free";
const PROMPT_PREFIX: &str = "Use young slangs and speak like you're chill. Be sarcastic.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterResponse {
    pub choices: Vec<OpenRouterChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterChoice {
    pub message: ChatMessage,
}

/// Relay a free-text prompt to the chat-completions provider
pub async fn ask(
    client: &reqwest::Client,
    api_key: &str,
    prompt: &str,
) -> anyhow::Result<String> {
    let body = json!({
        "model": MODEL,
        "messages": [
            { "role": "system", "content": PROMPT_PREFIX },
            { "role": "user", "content": prompt }
        ],
        "max_tokens": 2048,
        "temperature": 0.5,
    });

    let res = client
        .post(OPENROUTER_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("HTTP-Referer", "https://discord.com") // Required by OpenRouter
        .header("X-Title", "Hunted Bot")
        .json(&body)
        .send()
        .await?;

    if !res.status().is_success() {
        let error_text = res.text().await?;
        anyhow::bail!("OpenRouter API error: {}", error_text);
    }

    let response: OpenRouterResponse = res.json().await?;

    response
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .ok_or_else(|| anyhow::anyhow!("No choices in OpenRouter response"))
}
