use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::ClassificationError;

/// Ollama HTTP client for local LLM inference and embeddings.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at an Ollama instance.
    ///
    /// Generation is always deterministic JSON output (temperature 0, `format: "json"`).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClassificationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClassificationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Result<Self, ClassificationError> {
        Self::new(crate::config::DEFAULT_OLLAMA_URL, crate::config::DEFAULT_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Embed one text with an Ollama embedding model.
    pub fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, ClassificationError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = OllamaEmbeddingRequest {
            model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body, model));
        }

        let parsed: OllamaEmbeddingResponse = response
            .json()
            .map_err(|e| ClassificationError::ResponseParsing(e.to_string()))?;

        Ok(parsed.embedding)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClassificationError {
        if e.is_connect() {
            ClassificationError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            ClassificationError::HttpClient(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            ClassificationError::HttpClient(e.to_string())
        }
    }
}

/// Ollama answers 404 when the requested model has not been pulled.
fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> ClassificationError {
    if status == reqwest::StatusCode::NOT_FOUND {
        ClassificationError::ModelNotAvailable(model.to_string())
    } else {
        ClassificationError::OllamaError {
            status: status.as_u16(),
            body,
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Request body for Ollama /api/embeddings
#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, ClassificationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body, model));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| ClassificationError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ClassificationError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, ClassificationError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassificationError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| ClassificationError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing: returns a configurable response.
pub struct MockLlmClient {
    response: String,
    available_models: Vec<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            available_models: vec![crate::config::DEFAULT_LLM_MODEL.to_string()],
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, ClassificationError> {
        Ok(self.response.clone())
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ClassificationError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, ClassificationError> {
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Consume one request (headers plus Content-Length body).
    fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    return;
                }
            }
        }
    }

    /// Answer a single request on a loopback port with a canned response.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate("model", "prompt", "system").unwrap();
        assert_eq!(result, "test response");
    }

    #[test]
    fn mock_client_lists_models() {
        let client = MockLlmClient::new("").with_models(vec![
            "qwen2:0.5b".into(),
            "llama3:8b".into(),
        ]);
        let models = client.list_models().unwrap();
        assert_eq!(models.len(), 2);
        assert!(client.is_model_available("qwen2").unwrap());
    }

    #[test]
    fn mock_client_model_not_available() {
        let client = MockLlmClient::new("").with_models(vec!["llama3:8b".into()]);
        assert!(!client.is_model_available("qwen2").unwrap());
    }

    #[test]
    fn ollama_client_constructor() {
        let client = OllamaClient::new("http://localhost:11434", 120).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 120);
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = OllamaClient::default_local().unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 300);
    }

    #[test]
    fn generate_request_serializes_json_mode() {
        let body = OllamaGenerateRequest {
            model: "qwen2:0.5b",
            prompt: "p",
            system: "s",
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["format"], "json");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
    }

    #[test]
    fn generate_returns_response_field() {
        let url = serve_once(http_response(
            "200 OK",
            r#"{"model":"qwen2:0.5b","response":"{\"compliance_status\":\"Met\"}","done":true}"#,
        ));
        let client = OllamaClient::new(&url, 5).unwrap();
        let text = client.generate("qwen2:0.5b", "p", "s").unwrap();
        assert_eq!(text, r#"{"compliance_status":"Met"}"#);
    }

    #[test]
    fn missing_model_is_model_not_available() {
        let url = serve_once(http_response(
            "404 Not Found",
            r#"{"error":"model \"qwen2:0.5b\" not found, try pulling it first"}"#,
        ));
        let client = OllamaClient::new(&url, 5).unwrap();
        let err = client.generate("qwen2:0.5b", "p", "s").unwrap_err();
        assert!(matches!(err, ClassificationError::ModelNotAvailable(ref m) if m == "qwen2:0.5b"));
    }

    #[test]
    fn server_error_keeps_status_and_body() {
        let url = serve_once(http_response("500 Internal Server Error", r#"{"error":"oom"}"#));
        let client = OllamaClient::new(&url, 5).unwrap();
        let err = client.embed("all-minilm", "GHG emissions").unwrap_err();
        match err {
            ClassificationError::OllamaError { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("oom"));
            }
            other => panic!("expected OllamaError, got {other:?}"),
        }
    }

    #[test]
    fn silent_server_times_out() {
        // Accepted by the kernel backlog, never answered.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let client = OllamaClient::new(&url, 1).unwrap();
        let err = client.generate("qwen2:0.5b", "p", "s").unwrap_err();
        assert!(
            matches!(err, ClassificationError::HttpClient(ref m) if m == "Request timed out after 1s"),
            "unexpected error: {err:?}"
        );
        drop(listener);
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        // Port 9 (discard) is closed on test machines; connect fails fast.
        let client = OllamaClient::new("http://127.0.0.1:9", 5).unwrap();
        let err = client.list_models().unwrap_err();
        assert!(matches!(
            err,
            ClassificationError::OllamaConnection(_) | ClassificationError::HttpClient(_)
        ));
    }
}
