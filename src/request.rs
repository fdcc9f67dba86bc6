//! Unified request and response types for the comparison
//! pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GenerationOptions;
use crate::error::Error;

/// Incoming comparison request, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonRequest
{   /// The caller's own abstract
    #[serde(alias = "myAbstract")]
    pub subject: String
  , /// Raw comparison abstracts, any supported shape
    #[serde(alias = "compareAbstracts", default)]
    pub candidates: Value
  , /// Sampling options, all optional
    #[serde(default)]
    pub options: GenerationOptions
}

impl ComparisonRequest
{   pub fn new(subject: &str, candidates: Value) -> Self
    {   ComparisonRequest
        {   subject: subject.to_string()
          , candidates
          , options: GenerationOptions::default()
        }
    }

    pub fn with_options(
      mut self
    , options: GenerationOptions
    ) -> Self
    {   self.options = options;
        self
    }
}

/// Which strategy produced the comparison text
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy
{   /// The generation backend answered
    Generated
  , /// The local comparator answered after the backend failed
    Fallback
}

/// Provenance envelope attached to every result
/// A degraded (fallback) answer is still a success and says so
/// here explicitly
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetadata
{   pub subject_length: usize
  , pub candidate_count: usize
  , pub total_candidate_length: usize
  , pub elapsed_ms: u64
  , /// Unix epoch milliseconds at completion
    pub timestamp: u64
  , pub strategy: Strategy
}

/// Final result of one comparison call
/// Produced exactly once per request, never partially populated
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult
{   /// The comparison text
    pub text: String
  , /// Which strategy produced it
    pub strategy: Strategy
  , /// Request provenance
    pub metadata: ComparisonMetadata
}

// ===== External envelope =====

/// Transport-agnostic response envelope with an HTTP status hint
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse
{   Success
    {   success: bool
      , result: ComparisonResult
    }
  , Failure
    {   success: bool
      , error: String
      , code: String
    }
}

impl ApiResponse
{   pub fn from_result(
      outcome: Result<ComparisonResult, Error>
    ) -> Self
    {   match outcome
        {   Ok(result) => ApiResponse::Success
            {   success: true
              , result
            }
          , Err(e) => ApiResponse::Failure
            {   success: false
              , error: e.to_string()
              , code: e.code().to_string()
            }
        }
    }

    /// Status a transport binding should use
    pub fn http_status(&self) -> u16
    {   match self
        {   ApiResponse::Success { .. } => 200
          , ApiResponse::Failure { code, .. } => {
              match code.as_str()
              {   "INVALID_SUBJECT"
                  | "MISSING_CANDIDATES"
                  | "NO_VALID_ABSTRACTS" => 400
                , "CONNECTION_REFUSED" => 503
                , "TIMEOUT" => 504
                , _ => 500
              }
            }
        }
    }
}
