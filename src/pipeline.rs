//! The comparison orchestrator: validate, build the prompt, try
//! the generation backend, fall back to the local comparator

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;

use crate::config::EngineConfig;
use crate::error::Error;
use crate::fallback::FallbackComparator;
use crate::normalize::{self, AbstractText};
use crate::prompt;
use crate::providers::OllamaClient;
use crate::request::{
  ApiResponse, ComparisonMetadata, ComparisonRequest,
  ComparisonResult, Strategy,
};

/// The single externally-visible operation lives here
/// Holds only shared read-only configuration, the pooled HTTP
/// client, and the outbound-concurrency cap; concurrent calls
/// are independent
pub struct ComparisonEngine
{   backend: OllamaClient
  , fallback: FallbackComparator
  , generation_limit: Arc<Semaphore>
}

impl ComparisonEngine
{   pub fn new(config: EngineConfig) -> Self
    {   debug!("Creating ComparisonEngine");
        let cap = config
          .backend
          .max_concurrent_generations
          .max(1);
        ComparisonEngine
        {   backend: OllamaClient::new(config.backend)
          , fallback: FallbackComparator::new(config.fallback)
          , generation_limit: Arc::new(Semaphore::new(cap))
        }
    }

    /// Run one comparison request through the pipeline
    ///
    /// Per-call state machine: Validating -> BuildingPrompt ->
    /// Generating -> (FallingBack) -> Succeeded | Failed.
    /// Exactly one outbound generation attempt; zero or one
    /// fallback computation.
    pub async fn compare_abstracts(
      &self
    , request: &ComparisonRequest
    ) -> Result<ComparisonResult, Error>
    {   let started = Instant::now();

        // ----- Validating -----
        let subject = validate_subject(&request.subject)?;

        if request.candidates.is_null()
        {   debug!("Rejecting request: candidates missing");
            return Err(Error::MissingCandidates);
        }

        let candidates
          = normalize::normalize(&request.candidates);
        if candidates.is_empty()
        {   debug!(
              "Rejecting request: no candidate survived \
               normalization"
            );
            return Err(Error::NoValidAbstracts);
        }

        // ----- BuildingPrompt -----
        let prompt = prompt::build(
          &subject,
          &candidates,
          &request.options
        );
        debug!(
          "Prompt built: {} chars, {} candidate(s)",
          prompt.len(),
          candidates.len()
        );

        // ----- Generating -----
        // The permit only covers the outbound call, never the
        // fallback computation
        let generation = {
          match self.generation_limit.acquire().await
          {   Ok(_permit) => {
                self.backend
                  .generate(&prompt, &request.options)
                  .await
              }
            , Err(_) => Err(Error::Other(
                "generation limit closed".to_string()
              ))
          }
        };

        match generation
        {   Ok(text) => {
              info!("Comparison generated by backend");
              Ok(self.finish(
                text,
                Strategy::Generated,
                &subject,
                &candidates,
                started
              ))
            }
          , Err(generation_err) => {
              // ----- FallingBack -----
              warn!(
                "Generation failed ({}), using local fallback",
                generation_err
              );

              match self.fallback.compare(&subject, &candidates)
              {   Ok(text) => {
                    info!("Comparison produced by fallback");
                    Ok(self.finish(
                      text,
                      Strategy::Fallback,
                      &subject,
                      &candidates,
                      started
                    ))
                  }
                , Err(fallback_err) => {
                    warn!(
                      "Fallback failed too: {}",
                      fallback_err
                    );
                    Err(Error::AllServicesFailed
                    {   generation: generation_err.to_string()
                      , fallback: fallback_err.to_string()
                    })
                  }
              }
            }
        }
    }

    /// Run a request and shape the external envelope
    pub async fn respond(
      &self
    , request: &ComparisonRequest
    ) -> ApiResponse
    {   let outcome = self.compare_abstracts(request).await;
        ApiResponse::from_result(outcome)
    }

    fn finish(
      &self
    , text: String
    , strategy: Strategy
    , subject: &AbstractText
    , candidates: &[AbstractText]
    , started: Instant
    ) -> ComparisonResult
    {   let metadata = ComparisonMetadata
        {   subject_length: subject.char_count()
          , candidate_count: candidates.len()
          , total_candidate_length: candidates
              .iter()
              .map(|c| c.char_count())
              .sum()
          , elapsed_ms: started.elapsed().as_millis() as u64
          , timestamp: epoch_millis()
          , strategy
        };

        ComparisonResult
        {   text
          , strategy
          , metadata
        }
    }
}

impl Default for ComparisonEngine
{   fn default() -> Self
    {   ComparisonEngine::new(EngineConfig::default())
    }
}

/// Validate and clean the subject abstract
fn validate_subject(raw: &str)
  -> Result<AbstractText, Error>
{   if raw.trim().is_empty()
    {   debug!("Rejecting request: subject empty");
        return Err(Error::InvalidSubject(
          "myAbstract is required and must be non-empty"
            .to_string()
        ));
    }

    AbstractText::parse(raw).ok_or_else(|| {
      debug!("Rejecting request: subject too short");
      Error::InvalidSubject(format!(
        "subject must be at least {} characters after \
         cleaning",
        normalize::MIN_ABSTRACT_CHARS
      ))
    })
}

fn epoch_millis() -> u64
{   SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_millis() as u64)
      .unwrap_or(0)
}
