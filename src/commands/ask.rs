// Free-text relay to the chatbot provider

use tracing::warn;

use crate::api::llm;
use crate::{Context, Error};

/// Ask the chatbot a question
#[poise::command(prefix_command, rename = "ask", aliases("a", "chatgpt"))]
pub async fn ask(ctx: Context<'_>, #[rest] prompt: Option<String>) -> Result<(), Error> {
    let Some(prompt) = prompt else {
        ctx.say("Please provide a prompt, ex: `!ask who is the best Fortnite player?`")
            .await?;
        return Ok(());
    };

    let state = ctx.data();
    let Some(api_key) = state.config.openrouter_api_key.as_deref() else {
        ctx.say("The chatbot is not configured on this server").await?;
        return Ok(());
    };

    ctx.defer().await?;

    match llm::ask(&state.http_client, api_key, &prompt).await {
        Ok(response) => {
            ctx.say(response).await?;
        }
        Err(exc) => {
            warn!("Chatbot request failed: {}", exc);
            ctx.say("The chatbot is unavailable right now").await?;
        }
    }

    Ok(())
}
