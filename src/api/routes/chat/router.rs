//! Router for the chat relay API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use http::StatusCode;
use serde_json::{Value, json};

use super::public::ChatRequest;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::openai::completion;

type SharedState = Arc<RwLock<AppState>>;

fn messages_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({"error": "Messages are required"})),
    )
        .into_response()
}

fn upstream_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({"error": "Failed to fetch AI response"})),
    )
        .into_response()
}

/// Forward the message list to the completion provider with the server-held
/// credential attached, and relay back the provider's first choice message
/// verbatim
async fn chat_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<ChatRequest>,
) -> Response {
    let messages: Value = match payload.messages {
        Some(messages) if !messages.is_null() => messages,
        _ => return messages_required(),
    };
    if messages.as_array().is_some_and(|list| list.is_empty()) {
        return messages_required();
    }

    let (api_hostname, api_key, model) = {
        let shared_state = state.read().expect("Unable to read shared state");
        let AppConfig {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            ..
        } = &shared_state.config;
        (
            openai_api_hostname.clone(),
            openai_api_key.clone(),
            openai_model.clone(),
        )
    };

    match completion(&messages, &api_hostname, &api_key, &model).await {
        Ok(response) => match response.pointer("/choices/0/message") {
            Some(message) => axum::Json(message.clone()).into_response(),
            None => {
                tracing::error!("Completion response missing message: {}", response);
                upstream_failed()
            }
        },
        Err(e) => {
            tracing::error!("Error with completion API: {}", e);
            upstream_failed()
        }
    }
}

/// Create the chat relay router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    use crate::api::app;

    fn test_app(api_hostname: &str) -> Router {
        let config = AppConfig {
            transcript_path: "./chat_messages.json".to_string(),
            relay_api_url: "http://127.0.0.1:3000".to_string(),
            openai_api_hostname: api_hostname.to_string(),
            openai_api_key: "test-key".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
        };
        app(Arc::new(RwLock::new(AppState::new(config))))
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_missing_messages_is_a_client_error() {
        let app = test_app("http://127.0.0.1:1");

        for body in [r#"{}"#, r#"{"messages": null}"#, r#"{"messages": []}"#] {
            let (status, body) = post_chat(app.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Messages are required"}));
        }
    }

    #[tokio::test]
    async fn test_relays_first_choice_message_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello there"}, "finish_reason": "stop"}]}"#,
            )
            .create();

        let app = test_app(&server.url());
        let (status, body) =
            post_chat(app, r#"{"messages": [{"role": "user", "content": "hi"}]}"#).await;

        mock.assert();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"role": "assistant", "content": "Hello there"}));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_a_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "boom"}}"#)
            .create();

        let app = test_app(&server.url());
        let (status, body) =
            post_chat(app, r#"{"messages": [{"role": "user", "content": "hi"}]}"#).await;

        mock.assert();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch AI response"}));
    }

    #[tokio::test]
    async fn test_upstream_body_without_message_is_a_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create();

        let app = test_app(&server.url());
        let (status, body) =
            post_chat(app, r#"{"messages": [{"role": "user", "content": "hi"}]}"#).await;

        mock.assert();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch AI response"}));
    }
}
