pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod normalize;
pub mod prompt;
pub mod fallback;
pub mod pipeline;

/*

litrev is an async rust library that compares a researcher's own
abstract against a set of related-work abstracts. it normalizes
whatever shape the client sends (array, JSON-encoded string, bare
string, single object), builds one deterministic literature-review
prompt, asks a local Ollama-compatible backend to write the
comparison, and when the backend is unreachable falls back to a
local keyword/topic comparator that always answers.

litrev/
├── Cargo.toml          # Main manifest
├── src/
│   ├── lib.rs          # Re-exports and main documentation
│   ├── error.rs        # Custom error types and wire codes
│   ├── config.rs       # Backend, sampling and fallback config
│   ├── request.rs      # Unified request/response types
│   ├── normalize.rs    # Input shape sniffing and text cleaning
│   ├── prompt.rs       # Deterministic prompt template
│   ├── fallback.rs     # Local comparison strategies
│   ├── pipeline.rs     # Orchestrator and failover decision
│   └── providers/      # Generation backend implementations
│       ├── mod.rs      # Re-exports all backends
│       └── ollama.rs   # Ollama /api/generate client
└── tests/              # Integration tests

*/

pub use config::{
  BackendConfig, EngineConfig, FallbackConfig, FallbackMode,
  GenerationOptions, TopicRule,
};
pub use error::Error;
pub use fallback::FallbackComparator;
pub use normalize::AbstractText;
pub use pipeline::ComparisonEngine;
pub use providers::OllamaClient;
pub use request::{
  ApiResponse, ComparisonMetadata, ComparisonRequest,
  ComparisonResult, Strategy,
};
