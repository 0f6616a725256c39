//! Job matching: embeds the resume summary and catalog job descriptions,
//! ranks jobs by cosine similarity and reports skill gaps.

pub mod catalog;
pub mod embedder;
pub mod engine;
pub mod handlers;

pub use catalog::CatalogStore;
pub use embedder::{Embedder, HashingEmbedder, HttpEmbedder};
