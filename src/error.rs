use std::fmt;

/// Custom error type for litrev operations
/// Implements Clone for embedding in response payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Subject abstract missing, empty, or too short after cleaning
    InvalidSubject(String)
  , /// compareAbstracts field absent or null
    MissingCandidates
  , /// Every candidate was discarded during normalization
    NoValidAbstracts
  , /// Generation backend refused the connection
    ConnectionRefused(String)
  , /// Generation backend did not answer within the configured bound
    Timeout
  , /// Backend answered without the expected response field,
    /// or with a non-JSON body
    InvalidResponse(String)
  , /// Backend answered with a non-success HTTP status
    ApiError(String)
  , /// Fallback comparator called with an empty candidate list
    EmptyCandidates
  , /// Both the generation backend and the local fallback failed
    AllServicesFailed
    {   generation: String
      , fallback: String
    }
  , /// Generic error
    Other(String)
}

impl Error
{   /// Stable machine-readable code for the external interface
    pub fn code(&self) -> &'static str
    {   match self
        {   Error::InvalidSubject(_) => "INVALID_SUBJECT"
          , Error::MissingCandidates => "MISSING_CANDIDATES"
          , Error::NoValidAbstracts => "NO_VALID_ABSTRACTS"
          , Error::ConnectionRefused(_) => "CONNECTION_REFUSED"
          , Error::Timeout => "TIMEOUT"
          , Error::InvalidResponse(_) => "INVALID_RESPONSE"
          , Error::ApiError(_) => "API_ERROR"
          , Error::EmptyCandidates => "EMPTY_CANDIDATES"
          , Error::AllServicesFailed { .. } => "ALL_SERVICES_FAILED"
          , Error::Other(_) => "INTERNAL_ERROR"
        }
    }

    /// True when the caller's input was at fault (4xx-equivalent)
    pub fn is_validation(&self) -> bool
    {   matches!(
          self,
          Error::InvalidSubject(_)
            | Error::MissingCandidates
            | Error::NoValidAbstracts
        )
    }

    /// True when the generation backend failed in a way the
    /// orchestrator recovers from by falling back
    pub fn is_backend_unavailable(&self) -> bool
    {   matches!(
          self,
          Error::ConnectionRefused(_)
            | Error::Timeout
            | Error::InvalidResponse(_)
            | Error::ApiError(_)
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidSubject(msg) => {
              write!(f, "Invalid subject abstract: {}", msg)
            }
          , Error::MissingCandidates => {
              write!(f, "compareAbstracts is required")
            }
          , Error::NoValidAbstracts => {
              write!(f,
                "No valid comparison abstracts after normalization"
              )
            }
          , Error::ConnectionRefused(detail) => {
              write!(f,
                "Generation backend unreachable: {}",
                detail
              )
            }
          , Error::Timeout => {
              write!(f, "Generation request timed out")
            }
          , Error::InvalidResponse(msg) => {
              write!(f, "Invalid backend response: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "Backend API error: {}", msg)
            }
          , Error::EmptyCandidates => {
              write!(f,
                "Fallback comparator requires at least one candidate"
              )
            }
          , Error::AllServicesFailed { generation, fallback } => {
              write!(f,
                "Both comparison services failed \
                 (generation: {}; fallback: {})",
                generation, fallback
              )
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
