//! Rendered document.

use serde::Serialize;

use crate::{
    html::HtmlRenderer,
    node::{CodeBlock, Node, TocEntry},
};

/// The content tree of one document body, with the headings found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    /// Every heading in document order, with its final anchor id.
    pub headings: Vec<TocEntry>,
}

impl Document {
    /// Second and third level headings, for the in-page table of contents.
    pub fn table_of_contents(&self) -> Vec<&TocEntry> {
        self.headings
            .iter()
            .filter(|h| matches!(h.level, 2 | 3))
            .collect()
    }

    /// All code blocks in document order.
    pub fn code_blocks(&self) -> Vec<&CodeBlock> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a CodeBlock>) {
            for node in nodes {
                if let Node::CodeBlock(block) = node {
                    out.push(block);
                }
                walk(node.children(), out);
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Render with the default HTML strategies.
    pub fn to_html(&self) -> String {
        HtmlRenderer::new().render(&self.nodes)
    }
}
