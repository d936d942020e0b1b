//! Folio Parser Library
//!
//! Compiles document bodies written in a restricted markdown dialect into a
//! typed content tree, ready for display.
//!
//! # Modules
//!
//! - [`markdown`] - Markdown to [`Document`] using pulldown-cmark
//! - [`node`] - Content tree node types
//! - [`html`] - Dispatch-table HTML rendering of the tree
//! - [`syntax`] - Code highlighting with syntect
//! - [`slug`] - Heading anchor ids
//! - [`link`] - Internal/anchor/external link classification

pub mod document;
pub mod html;
pub mod link;
pub mod markdown;
pub mod node;
pub mod slug;
pub mod syntax;

pub use document::Document;
pub use html::{HtmlRenderer, RenderFn};
pub use link::LinkKind;
pub use markdown::MarkdownRenderer;
pub use node::{Alignment, CalloutKind, CodeBlock, Node, NodeKind, TocEntry};
pub use slug::slugify;
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Errors from the parser crate.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The configured highlighting theme is not bundled.
    #[error("unknown syntax theme `{theme}` (available: {available})")]
    UnknownTheme { theme: String, available: String },
}
