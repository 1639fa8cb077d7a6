//! # Recall Core
//!
//! Runtime-agnostic logic for Recall: the data model, vector math and
//! BLOB codec, bounded top-K selection, Reciprocal Rank Fusion, and the
//! collaborator traits (embedder, reranker, stores) the retrieval engine
//! is written against.
//!
//! This crate contains no tokio, sqlx, filesystem or network code. The
//! `recall` application crate supplies SQLite and HTTP implementations.

pub mod embedding;
pub mod fusion;
pub mod models;
pub mod rerank;
pub mod store;
pub mod topk;
