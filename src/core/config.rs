use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub transcript_path: String,
    pub relay_api_url: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("CHATBOX_STORAGE_PATH").unwrap_or(".".to_string());
        let transcript_path = format!(
            "{}/chat_messages.json",
            storage_path.trim_end_matches('/')
        );
        let relay_api_url = env::var("CHATBOX_RELAY_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let openai_api_hostname = env::var("CHATBOX_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_model =
            env::var("CHATBOX_LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

        Self {
            transcript_path,
            relay_api_url,
            openai_api_hostname,
            openai_api_key,
            openai_model,
        }
    }
}
