use anyhow::{Error, Result};
use serde_json::{Value, json};

/// One chat completion call against the provider. The caller supplies the
/// message list verbatim; the server-held credential is attached here.
pub async fn completion(
    messages: &Value,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion_basic() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }]
        }"#;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create();

        let messages = json!([{"role": "user", "content": "Hi"}]);
        let result = completion(&messages, server.url().as_str(), "test-key", "gpt-3.5-turbo").await;

        mock.assert();
        assert!(result.is_ok());

        let json = result.unwrap();
        assert_eq!(json["choices"][0]["message"]["content"], "Hello!");
    }

    #[tokio::test]
    async fn test_completion_non_2xx_is_an_error() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "bad key"}}"#)
            .create();

        let messages = json!([{"role": "user", "content": "Hi"}]);
        let result = completion(&messages, server.url().as_str(), "bad-key", "gpt-3.5-turbo").await;

        mock.assert();
        assert!(result.is_err());
    }
}
