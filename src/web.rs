// Replay elimination webhook
// A companion app parses replay files on the player's machine and posts
// the elimination breakdown here; each player involved gets a stats
// lookup and snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha512};
use tokio::time::timeout;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::features::stats_service;
use crate::models::modes;
use crate::AppState;

/// Webhook handlers block on the Discord-side work at most this long
/// before reporting a synchronous failure.
const HANDLER_TIMEOUT_SEC: u64 = 30;

#[derive(Clone)]
pub struct WebState {
    pub app: Arc<AppState>,
    pub discord_http: Arc<serenity::Http>,
}

/// Elimination breakdown extracted from one replay file. Keys of both
/// maps are player identifiers (replay GUIDs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElimPayload {
    #[serde(default)]
    pub silent: bool,
    /// Game mode label read from the replay metadata, loosely formatted
    #[serde(default)]
    pub game_mode: Option<String>,
    pub killed: HashMap<String, Vec<String>>,
    pub killed_by: HashMap<String, Vec<String>>,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/fortnite/replay/elims", post(post_replay_elims))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: WebState, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Webhook service listening on {}", bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn post_replay_elims(
    State(state): State<WebState>,
    headers: HeaderMap,
    payload: Result<Json<ElimPayload>, JsonRejection>,
) -> Response {
    // Authentication runs before any parsing or business logic
    if let Err(response) = verify_token(
        headers.get("API-TOKEN").and_then(|v| v.to_str().ok()),
        &state.app.config.api_auth_digest,
    ) {
        return response;
    }

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "errors": [rejection.body_text()],
                }),
            );
        }
    };

    let outcome = timeout(
        Duration::from_secs(HANDLER_TIMEOUT_SEC),
        process_eliminations(&state, &payload),
    )
    .await;

    match outcome {
        Ok(errors) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": payload,
                "errors": errors,
            })),
        )
            .into_response(),
        Err(_) => {
            error!("Replay elimination processing timed out");
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                json!({ "error": "Stats processing timed out" }),
            )
        }
    }
}

/// Look up stats for every player in the payload. Failures are
/// collected per player; one broken lookup never fails the request.
async fn process_eliminations(
    state: &WebState,
    payload: &ElimPayload,
) -> HashMap<String, String> {
    let family = {
        let settings = state.app.settings.read().await;
        match &payload.game_mode {
            Some(hint) => {
                let resolved = modes::resolve_from_hint(hint, &settings.game_mode);
                modes::active_family(&resolved)
            }
            None => modes::active_family(&settings.game_mode),
        }
    };

    let channel_id = serenity::ChannelId::new(state.app.config.text_channel_id);
    let player_ids: Vec<&String> = payload.killed.keys().chain(payload.killed_by.keys()).collect();

    let tasks = player_ids.into_iter().map(|player_id| {
        let player_id = player_id.clone();
        async move {
            let outcome = stats_service::run_player_search(
                &state.app,
                &state.discord_http,
                channel_id,
                &player_id,
                true,
                family,
                payload.silent,
            )
            .await;
            (player_id, outcome)
        }
    });

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .filter_map(|(player_id, outcome)| {
            outcome.err().map(|exc| (player_id, exc.to_string()))
        })
        .collect()
}

/// Check the API-TOKEN header against the pre-shared SHA-512 digest.
/// A missing header and a wrong token produce different status codes.
fn verify_token(header: Option<&str>, expected_digest: &str) -> Result<(), Response> {
    let token = match header {
        Some(token) => token,
        None => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": "Authentication header not provided" }),
            ));
        }
    };

    if sha512_hex(token) != expected_digest {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Unauthorized" }),
        ));
    }

    Ok(())
}

fn sha512_hex(token: &str) -> String {
    let digest = Sha512::digest(token.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn error_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt; // for `oneshot`

    #[test]
    fn test_sha512_hex_matches_known_digest() {
        // sha512("token") from a reference implementation
        assert_eq!(
            sha512_hex("token"),
            "2265daba0872fc3aef169d079365e590f0cbc8ed46c2a7984c8a642803cfd96c\
             b47804a63cf22a79f6ca469268c29ee9e72a5059b62d0a598fe42dfc8dcc51bc"
        );
    }

    #[test]
    fn test_missing_header_is_bad_request() {
        let result = verify_token(None, "irrelevant");
        let response = result.unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_wrong_token_is_unauthorized() {
        let result = verify_token(Some("wrong"), &sha512_hex("right"));
        let response = result.unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_matching_token_passes() {
        assert!(verify_token(Some("right"), &sha512_hex("right")).is_ok());
    }

    #[test]
    fn test_payload_silent_defaults_to_false() {
        let payload: ElimPayload =
            serde_json::from_str(r#"{"killed": {"abc123": []}, "killed_by": {}}"#).unwrap();
        assert!(!payload.silent);
        assert!(payload.game_mode.is_none());
        assert!(payload.killed.contains_key("abc123"));
    }

    #[tokio::test]
    async fn test_healthcheck_needs_no_auth() {
        let app = Router::new().route("/healthcheck", get(healthcheck));

        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/healthcheck")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "ok");
    }
}
