//! # routing-providers
//!
//! External provider contracts.
//!
//! The embedding and generative-language services are remote capabilities
//! the engine calls but does not implement. Both are slow network
//! operations that may fail; every call site in the engine has a defined
//! fallback, so provider errors never propagate out of the engine as
//! fatal.

pub mod completion;
pub mod embedding;
pub mod error;

pub use completion::{CompletionProvider, FixedCompletionProvider, NoOpCompletionProvider};
pub use embedding::{EmbeddingProvider, NoOpEmbeddingProvider};
pub use error::ProviderError;
