//! Storage abstractions for service layer
//!
//! Contains the file-backed map store used to persist small JSON documents
//! with whole-file atomic rewrites.

pub mod json_map_store;
