//! Typed content tree produced by the renderer.

use serde::Serialize;

use crate::link::LinkKind;

/// A node of the rendered content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Heading {
        level: u8,
        id: String,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    InlineCode {
        value: String,
    },
    Link {
        kind: LinkKind,
        href: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    CodeBlock(CodeBlock),
    List {
        /// First number of an ordered list, `None` for bullet lists.
        start: Option<u64>,
        items: Vec<Node>,
    },
    ListItem {
        /// Task list state, `None` for plain items.
        checked: Option<bool>,
        children: Vec<Node>,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    Callout {
        kind: CalloutKind,
        children: Vec<Node>,
    },
    Table {
        alignments: Vec<Alignment>,
        rows: Vec<Node>,
    },
    TableRow {
        header: bool,
        cells: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    Rule,
    SoftBreak,
    HardBreak,
    /// Raw HTML passed through unchanged.
    Html {
        value: String,
    },
}

/// Discriminant of [`Node`], used as the key of the render dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Heading,
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode,
    Link,
    Image,
    CodeBlock,
    List,
    ListItem,
    BlockQuote,
    Callout,
    Table,
    TableRow,
    TableCell,
    Rule,
    SoftBreak,
    HardBreak,
    Html,
}

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    /// Language tag from the fence info string.
    pub lang: Option<String>,
    /// Raw source text, exactly as written, for copy-to-clipboard.
    pub code: String,
    /// Highlighted HTML.
    pub html: String,
}

/// Visual flavour of a callout block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    #[default]
    Info,
    Warning,
    Success,
}

impl CalloutKind {
    /// Parse a callout `type` attribute, falling back to `Info` for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" | "caution" | "danger" => Self::Warning,
            "success" | "tip" => Self::Success,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

/// Table column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub(crate) fn as_css(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub text: String,
    /// Anchor id.
    pub id: String,
}

impl Node {
    /// The dispatch key of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Heading { .. } => NodeKind::Heading,
            Self::Paragraph { .. } => NodeKind::Paragraph,
            Self::Text { .. } => NodeKind::Text,
            Self::Emphasis { .. } => NodeKind::Emphasis,
            Self::Strong { .. } => NodeKind::Strong,
            Self::Strikethrough { .. } => NodeKind::Strikethrough,
            Self::InlineCode { .. } => NodeKind::InlineCode,
            Self::Link { .. } => NodeKind::Link,
            Self::Image { .. } => NodeKind::Image,
            Self::CodeBlock(_) => NodeKind::CodeBlock,
            Self::List { .. } => NodeKind::List,
            Self::ListItem { .. } => NodeKind::ListItem,
            Self::BlockQuote { .. } => NodeKind::BlockQuote,
            Self::Callout { .. } => NodeKind::Callout,
            Self::Table { .. } => NodeKind::Table,
            Self::TableRow { .. } => NodeKind::TableRow,
            Self::TableCell { .. } => NodeKind::TableCell,
            Self::Rule => NodeKind::Rule,
            Self::SoftBreak => NodeKind::SoftBreak,
            Self::HardBreak => NodeKind::HardBreak,
            Self::Html { .. } => NodeKind::Html,
        }
    }

    /// Shorthand for a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Heading { children, .. }
            | Self::Paragraph { children }
            | Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Strikethrough { children }
            | Self::Link { children, .. }
            | Self::ListItem { children, .. }
            | Self::BlockQuote { children }
            | Self::Callout { children, .. }
            | Self::TableCell { children } => children,
            Self::List { items, .. } => items,
            Self::Table { rows, .. } => rows,
            Self::TableRow { cells, .. } => cells,
            _ => &[],
        }
    }

    /// Concatenated text content, without markup.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } | Self::InlineCode { value } => out.push_str(value),
            Self::Image { alt, .. } => out.push_str(alt),
            Self::CodeBlock(block) => out.push_str(&block.code),
            Self::SoftBreak | Self::HardBreak => out.push(' '),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Concatenated text of a node list.
pub fn plain_text(nodes: &[Node]) -> String {
    nodes.iter().map(Node::plain_text).collect()
}
