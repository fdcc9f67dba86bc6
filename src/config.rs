//! Configuration for the comparison engine, generation backend,
//! and fallback behavior

use serde::{Deserialize, Serialize};

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig
{   /// API base URL
    pub api_base: String
  , /// Default model name
    pub model: String
  , /// Request timeout in seconds (always enforced)
    pub timeout_secs: u64
  , /// Cap on simultaneous outbound generation calls
    pub max_concurrent_generations: usize
}

impl Default for BackendConfig
{   fn default() -> Self
    {   BackendConfig
        {   api_base: "http://localhost:11434".to_string()
          , model: "llama3".to_string()
          , timeout_secs: 30
          , max_concurrent_generations: 4
        }
    }
}

/// Sampling options for a generation request
/// Unset fields take defaults; invalid values are clamped
/// or defaulted, never fatal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions
{   /// Model override for this request
    pub model: Option<String>
  , /// Sampling temperature, clamped to [0, 2]
    pub temperature: Option<f32>
  , /// Top-k sampling cutoff
    #[serde(alias = "topK")]
    pub top_k: Option<i64>
  , /// Nucleus sampling mass, clamped to [0, 1]
    #[serde(alias = "topP")]
    pub top_p: Option<f32>
  , /// Repetition penalty
    #[serde(alias = "repeatPenalty")]
    pub repeat_penalty: Option<f32>
  , /// Maximum tokens to generate
    #[serde(alias = "maxTokens")]
    pub max_tokens: Option<i64>
}

impl GenerationOptions
{   /// Effective model name, falling back to the backend default
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str
    {   match &self.model
        {   Some(m) if !m.trim().is_empty() => m
          , _ => fallback
        }
    }

    /// Effective temperature, default 0.7
    pub fn temperature(&self) -> f32
    {   match self.temperature
        {   Some(t) if t.is_finite() => t.clamp(0.0, 2.0)
          , _ => 0.7
        }
    }

    /// Effective top-k, default 40
    pub fn top_k(&self) -> u32
    {   match self.top_k
        {   Some(k) if k > 0 => k.min(u32::MAX as i64) as u32
          , _ => 40
        }
    }

    /// Effective top-p, default 0.9
    pub fn top_p(&self) -> f32
    {   match self.top_p
        {   Some(p) if p.is_finite() => p.clamp(0.0, 1.0)
          , _ => 0.9
        }
    }

    /// Effective repeat penalty, default 1.1
    pub fn repeat_penalty(&self) -> f32
    {   match self.repeat_penalty
        {   Some(r) if r.is_finite() && r >= 0.0 => r
          , _ => 1.1
        }
    }

    /// Effective generation budget, default 2000 tokens
    pub fn max_tokens(&self) -> u32
    {   match self.max_tokens
        {   Some(n) if n > 0 => n.min(u32::MAX as i64) as u32
          , _ => 2000
        }
    }
}

/// Which local comparison strategy the fallback uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode
{   /// Group candidates into topic buckets via keyword vocabulary
    TopicGroups
  , /// Last resort: per-candidate lexical overlap percentages
    LexicalSimilarity
}

/// One topic predicate of the fallback vocabulary
/// A candidate belongs to the first rule whose keyword matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRule
{   /// Topic name rendered in the report
    pub topic: String
  , /// Case-folded keywords probed as whole words
    pub keywords: Vec<String>
}

impl TopicRule
{   pub fn new(topic: &str, keywords: &[&str]) -> Self
    {   TopicRule
        {   topic: topic.to_string()
          , keywords: keywords
              .iter()
              .map(|k| k.to_string())
              .collect()
        }
    }
}

/// Fallback comparator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig
{   /// Selected comparison mode
    pub mode: FallbackMode
  , /// Ordered topic vocabulary, first match wins
    pub vocabulary: Vec<TopicRule>
}

impl Default for FallbackConfig
{   fn default() -> Self
    {   FallbackConfig
        {   mode: FallbackMode::TopicGroups
          , vocabulary: default_vocabulary()
        }
    }
}

/// Built-in topic vocabulary for document-analysis literature
pub fn default_vocabulary() -> Vec<TopicRule>
{   vec![
      TopicRule::new(
        "blockchain and distributed storage"
      , &["blockchain", "immutable", "distributed", "ledger"]
      )
    , TopicRule::new(
        "document classification"
      , &["classification", "classifier", "categorization"]
      )
    , TopicRule::new(
        "text mining and OCR"
      , &["ocr", "mining", "extraction", "recognition"]
      )
    , TopicRule::new(
        "information retrieval"
      , &["retrieval", "search", "indexing", "query"]
      )
    , TopicRule::new(
        "machine learning"
      , &["learning", "neural", "model", "training"]
      )
    ]
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig
{   /// Generation backend settings
    pub backend: BackendConfig
  , /// Fallback comparator settings
    pub fallback: FallbackConfig
}
