//! Gemini CLI subprocess invocation
//!
//! Invokes the `@google/gemini-cli` via npx as a subprocess, handles
//! timeouts, classifies rate-limit and auth failures, and retries
//! transient errors with exponential backoff.

use crate::config::GeminiConfig;
use crate::error::{Error, LlmError};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Gemini CLI client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with default configuration
    pub fn new() -> Self {
        Self {
            config: GeminiConfig::default(),
        }
    }

    /// Create a new Gemini client with custom configuration
    pub fn with_config(config: GeminiConfig) -> Self {
        Self { config }
    }

    /// Query Gemini with retry logic
    pub async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let mut attempts = 0;
        let mut backoff_ms = 1000;

        loop {
            attempts += 1;
            debug!("Gemini attempt {} of {}", attempts, self.config.max_retries);

            match self.generate_once(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.config.max_retries => {
                    warn!("Gemini request failed after {} attempts", attempts);
                    return Err(e);
                }
                Err(e) => {
                    if e.is_retryable() {
                        warn!(
                            "Gemini request failed (attempt {}), retrying in {}ms: {}",
                            attempts, backoff_ms, e
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                        backoff_ms *= 2;
                    } else {
                        warn!("Gemini request failed with non-retryable error: {}", e);
                        return Err(e);
                    }
                }
            }
        }
    }

    /// Execute a single request without retry
    async fn generate_once(&self, prompt: &str) -> Result<String, Error> {
        // Build command: npx @google/gemini-cli "prompt"
        let mut cmd = Command::new("npx");
        cmd.args(["@google/gemini-cli", prompt])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        debug!(
            "Executing: npx @google/gemini-cli [prompt: {} chars]",
            prompt.len()
        );

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let child = cmd.spawn().map_err(|e| {
            Error::Llm(LlmError::RequestFailed {
                model: "gemini".to_string(),
                source: format!("Failed to spawn process: {}", e),
            })
        })?;

        let output = tokio::time::timeout(timeout_duration, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::Llm(LlmError::RequestFailed {
                    model: "gemini".to_string(),
                    source: format!("Timeout after {}s", self.config.timeout_secs),
                })
            })?
            .map_err(|e| {
                Error::Llm(LlmError::RequestFailed {
                    model: "gemini".to_string(),
                    source: format!("Process error: {}", e),
                })
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.parse_error(&stderr));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            Error::Llm(LlmError::InvalidResponse {
                model: "gemini".to_string(),
                details: format!("Invalid UTF-8 in output: {}", e),
            })
        })?;

        debug!("Gemini request completed successfully");
        Ok(stdout.trim().to_string())
    }

    /// Parse error from stderr to determine error type
    fn parse_error(&self, stderr: &str) -> Error {
        let lower = stderr.to_lowercase();

        if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota") {
            let retry_after = self.extract_retry_after(stderr);
            return Error::Llm(LlmError::RateLimitExceeded {
                model: "gemini".to_string(),
                retry_after,
            });
        }

        if lower.contains("unauthorized")
            || lower.contains("authentication")
            || lower.contains("api key")
            || lower.contains("401")
        {
            return Error::Llm(LlmError::AuthenticationFailed("gemini".to_string()));
        }

        if lower.contains("503") || lower.contains("unavailable") || lower.contains("overloaded") {
            return Error::Llm(LlmError::ModelUnavailable("gemini".to_string()));
        }

        Error::Llm(LlmError::RequestFailed {
            model: "gemini".to_string(),
            source: stderr.to_string(),
        })
    }

    /// Extract retry-after duration from error message
    fn extract_retry_after(&self, stderr: &str) -> Option<u64> {
        // Look for patterns like "retry after 60 seconds" or "retry-after: 60"
        let re = regex::Regex::new(r"(?i)retry[- ]after:?\s*(\d+)").ok()?;
        re.captures(stderr)?.get(1)?.as_str().parse().ok()
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::llm::ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, Error> {
        self.generate(prompt).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let client = GeminiClient::new();
        assert_eq!(client.config.timeout_secs, 120);
        assert_eq!(client.config.max_retries, 3);
    }

    #[test]
    fn test_parse_rate_limit_error() {
        let client = GeminiClient::new();
        let error = client.parse_error("Error: 429 Too Many Requests - quota exceeded");
        assert!(matches!(
            error,
            Error::Llm(LlmError::RateLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_parse_auth_error() {
        let client = GeminiClient::new();
        let error = client.parse_error("Error: invalid API key provided");
        assert!(matches!(
            error,
            Error::Llm(LlmError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn test_parse_unavailable_error() {
        let client = GeminiClient::new();
        let error = client.parse_error("Error: 503 Service Unavailable");
        assert!(matches!(error, Error::Llm(LlmError::ModelUnavailable(_))));
    }

    #[test]
    fn test_parse_generic_error() {
        let client = GeminiClient::new();
        let error = client.parse_error("something odd happened");
        assert!(matches!(error, Error::Llm(LlmError::RequestFailed { .. })));
    }

    #[test]
    fn test_extract_retry_after() {
        let client = GeminiClient::new();
        assert_eq!(client.extract_retry_after("retry after 60 seconds"), Some(60));
        assert_eq!(client.extract_retry_after("retry-after: 120"), Some(120));
        assert_eq!(client.extract_retry_after("no retry info"), None);
    }
}
