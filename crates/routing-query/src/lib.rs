//! # routing-query
//!
//! Query-time routing. A question is embedded, matched against stored
//! knowledge points and topic centroids, optionally reranked by a
//! generative provider, and resolved to ranked content matches and
//! suggested experts. The router never synthesizes an answer and never
//! fails: every external error degrades to a partial response.

pub mod rerank;
pub mod router;

pub use router::QueryRouter;
