//! Document module - The node tree that keywords are annotated in
//!
//! Provides:
//! - node: DocumentTree and its Text/Element/Highlight nodes
//! - parse: HTML5 markup ingestion into a DocumentTree
//! - serialize: HTML output with highlight wrappers

pub mod node;
pub mod parse;
pub mod serialize;
