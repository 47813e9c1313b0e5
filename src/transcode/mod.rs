//! Format transcoder — markdown text ⇄ word-processor documents.

pub mod docx;
pub mod markdown;

pub use markdown::{render_to_document, render_to_markdown};
