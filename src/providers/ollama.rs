//! Client for a local Ollama-compatible generation endpoint

use log::{debug, error, trace};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::{BackendConfig, GenerationOptions};
use crate::error::Error;

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest
{   pub model: String
  , pub prompt: String
  , pub stream: bool
  , pub options: SamplingOptions
}

#[derive(Debug, Clone, Serialize)]
pub struct SamplingOptions
{   pub temperature: f32
  , pub top_k: u32
  , pub top_p: f32
  , pub repeat_penalty: f32
  , pub num_predict: u32
}

impl SamplingOptions
{   /// Resolve caller options into concrete wire values
    pub fn from_options(options: &GenerationOptions) -> Self
    {   SamplingOptions
        {   temperature: options.temperature()
          , top_k: options.top_k()
          , top_p: options.top_p()
          , repeat_penalty: options.repeat_penalty()
          , num_predict: options.max_tokens()
        }
    }
}

// ===== Ollama Client =====

/// One-shot generation client
/// Performs exactly one outbound request per call; retry and
/// fallback decisions belong to the pipeline, not here
pub struct OllamaClient
{   http_client: reqwest::Client
  , config: BackendConfig
}

impl OllamaClient
{   pub fn new(config: BackendConfig) -> Self
    {   debug!(
          "Creating OllamaClient for {}",
          config.api_base
        );
        OllamaClient
        {   http_client: reqwest::Client::new()
          , config
        }
    }

    pub fn config(&self) -> &BackendConfig
    {   &self.config
    }

    /// Send the prompt and return the generated text
    /// The configured timeout is always enforced
    pub async fn generate(
      &self
    , prompt: &str
    , options: &GenerationOptions
    ) -> Result<String, Error>
    {   let model = options
          .model_or(&self.config.model)
          .to_string();

        debug!("Generating with model: {}", model);

        let request = GenerateRequest
        {   model
          , prompt: prompt.to_string()
          , stream: false
          , options: SamplingOptions::from_options(options)
        };

        trace!("Generate request: {:?}", request);

        let response = self.http_client
          .post(format!(
            "{}/api/generate",
            self.config.api_base
          ))
          .timeout(Duration::from_secs(
            self.config.timeout_secs
          ))
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            if e.is_timeout()
            {   error!("Generation timed out");
                Error::Timeout
            } else
            {   error!("Backend unreachable: {}", e);
                Error::ConnectionRefused(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("Generate response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Backend API error: {}", error_text);
            return Err(Error::ApiError(
              format!("{}: {}", status, error_text)
            ));
        }

        // The enforced timeout also covers the body read, a
        // backend stalling after its headers is still a timeout
        let body: Value = response.json().await
          .map_err(|e| {
            if e.is_timeout()
            {   error!("Timed out reading backend body");
                Error::Timeout
            } else
            {   error!("Non-JSON backend body: {}", e);
                Error::InvalidResponse(e.to_string())
            }
          })?;

        extract_response_text(&body)
    }
}

/// Pull the generated text out of the backend body
/// The backend may return a rich value in the response field,
/// anything non-string is serialized back to text
fn extract_response_text(body: &Value)
  -> Result<String, Error>
{   match body.get("response")
    {   Some(Value::String(text)) => Ok(text.clone())
      , Some(Value::Null) | None => {
          error!("Backend body missing response field");
          Err(Error::InvalidResponse(
            "missing response field".to_string()
          ))
        }
      , Some(other) => {
          serde_json::to_string(other)
            .map_err(|e| {
              error!("Unserializable response value: {}", e);
              Error::InvalidResponse(e.to_string())
            })
        }
    }
}
