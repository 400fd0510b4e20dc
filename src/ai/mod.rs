pub mod openai;
pub mod openrouter;
pub mod types;
pub mod unified;

pub use openai::OpenAiProvider;
pub use openrouter::OpenRouterProvider;
pub use types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
pub use unified::AnyProvider;

pub(crate) fn build_llm_http_client() -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();

    if let Ok(raw) = std::env::var("LLM_PROXY") {
        let t = raw.trim();
        if !t.is_empty() {
            let url = if t.contains("://") {
                t.to_string()
            } else {
                format!("socks5h://{}", t)
            };
            let proxy = reqwest::Proxy::all(&url).map_err(|e| LlmError::Http(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(|e| LlmError::Http(e.to_string()))
}

/// Pull the assistant text out of a chat-completions style payload.
/// Providers differ in whether content is a string or a list of parts, so
/// this stays lenient on purpose.
pub(crate) fn extract_completion_text(raw: &str) -> Result<String, LlmError> {
    let v: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| LlmError::InvalidResponse(format!("json parse failed: {e}, raw={raw}")))?;

    let choice0 = v
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| LlmError::InvalidResponse(format!("missing choices[0], raw={raw}")))?;

    let content = choice0
        .get("message")
        .and_then(|m| m.get("content"))
        .or_else(|| choice0.get("content"));

    match content {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Array(parts)) => {
            let mut out = Vec::new();
            for part in parts {
                if let Some(t) = part.get("text").and_then(|x| x.as_str()) {
                    out.push(t.to_string());
                } else if let Some(t) = part.as_str() {
                    out.push(t.to_string());
                }
            }
            Ok(out.join("\n"))
        }
        _ => {
            if let Some(s) = choice0.get("text").and_then(|t| t.as_str()) {
                Ok(s.to_string())
            } else {
                Err(LlmError::InvalidResponse(format!(
                    "missing content/text in choices[0], raw={raw}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extract_completion_text;

    #[test]
    fn extracts_plain_string_content() {
        let raw = r#"{"choices":[{"message":{"content":"モチベ系"}}]}"#;
        assert_eq!(extract_completion_text(raw).unwrap(), "モチベ系");
    }

    #[test]
    fn extracts_part_list_content() {
        let raw = r#"{"choices":[{"message":{"content":[{"text":"記録系"}]}}]}"#;
        assert_eq!(extract_completion_text(raw).unwrap(), "記録系");
    }

    #[test]
    fn missing_choices_is_invalid() {
        assert!(extract_completion_text(r#"{"error":"nope"}"#).is_err());
    }
}
