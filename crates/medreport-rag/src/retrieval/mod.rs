//! Retrieval: top-k similarity queries over the per-user index

mod retriever;

pub use retriever::Retriever;
