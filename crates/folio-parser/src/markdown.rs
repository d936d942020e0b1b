//! Markdown to content tree using pulldown-cmark.

use std::borrow::Cow;

use pulldown_cmark::{BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag};
use tracing::debug;

use crate::{
    ParserError,
    document::Document,
    link::LinkKind,
    node::{Alignment, CalloutKind, CodeBlock, Node, TocEntry, plain_text},
    slug::{HeadingIds, slugify},
    syntax::SyntaxHighlighter,
};

/// Markdown renderer with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownRenderer {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with the default highlighting theme.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_GFM);

        Self {
            highlighter: SyntaxHighlighter::default(),
            options,
        }
    }

    /// Create a renderer with a named syntax theme.
    pub fn with_theme(theme: &str) -> Result<Self, ParserError> {
        let mut renderer = Self::new();
        renderer.highlighter.set_theme(theme)?;
        Ok(renderer)
    }

    /// Compile a document body into a content tree.
    pub fn render(&self, body: &str) -> Document {
        let source = isolate_callout_tags(body);
        let parser = Parser::new_ext(&source, self.options);

        let mut builder = TreeBuilder::new(&self.highlighter);
        for event in parser {
            builder.handle(event);
        }
        let document = builder.finish();

        debug!(
            nodes = document.nodes.len(),
            headings = document.headings.len(),
            "rendered document"
        );
        document
    }
}

/// Container currently being filled while walking the event stream.
#[derive(Debug)]
enum Open {
    Root,
    Heading { level: u8, id: Option<String> },
    Paragraph,
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: String },
    Image { src: String, title: String },
    CodeBlock { lang: Option<String> },
    List(Option<u64>),
    Item { checked: Option<bool> },
    BlockQuote,
    Callout(CalloutKind),
    /// Callout opened by a `<Callout>` tag rather than by the parser.
    TagCallout(CalloutKind),
    HtmlBlock,
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    /// Unsupported container; its children are spliced into the parent.
    Passthrough,
}

#[derive(Debug)]
struct Frame {
    open: Open,
    children: Vec<Node>,
    raw: String,
}

impl Frame {
    fn new(open: Open) -> Self {
        Self {
            open,
            children: Vec::new(),
            raw: String::new(),
        }
    }
}

struct TreeBuilder<'a> {
    highlighter: &'a SyntaxHighlighter,
    stack: Vec<Frame>,
    ids: HeadingIds,
    headings: Vec<TocEntry>,
}

impl<'a> TreeBuilder<'a> {
    fn new(highlighter: &'a SyntaxHighlighter) -> Self {
        Self {
            highlighter,
            stack: vec![Frame::new(Open::Root)],
            ids: HeadingIds::new(),
            headings: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(Node::InlineCode {
                value: code.to_string(),
            }),
            Event::Html(html) => {
                if matches!(self.top().map(|f| &f.open), Some(Open::HtmlBlock)) {
                    if let Some(frame) = self.top_mut() {
                        frame.raw.push_str(&html);
                    }
                } else {
                    self.push(Node::Html {
                        value: html.to_string(),
                    });
                }
            }
            Event::InlineHtml(html) => self.push(Node::Html {
                value: html.to_string(),
            }),
            Event::SoftBreak => self.push(Node::SoftBreak),
            Event::HardBreak => self.push(Node::HardBreak),
            Event::Rule => self.push(Node::Rule),
            Event::TaskListMarker(checked) => {
                if let Some(Frame {
                    open: Open::Item { checked: state },
                    ..
                }) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| matches!(f.open, Open::Item { .. }))
                {
                    *state = Some(checked);
                }
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.push(Node::InlineCode {
                value: math.to_string(),
            }),
            Event::FootnoteReference(name) => self.text(&format!("[{name}]")),
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, id, .. } => Open::Heading {
                level: level as u8,
                id: id.map(|i| i.to_string()),
            },
            Tag::BlockQuote(Some(kind)) => Open::Callout(callout_for_alert(kind)),
            Tag::BlockQuote(None) => Open::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Open::CodeBlock {
                lang: fence_language(&info),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Open::CodeBlock { lang: None },
            Tag::HtmlBlock => Open::HtmlBlock,
            Tag::List(start) => Open::List(start),
            Tag::Item => Open::Item { checked: None },
            Tag::Table(alignments) => {
                Open::Table(alignments.into_iter().map(convert_alignment).collect())
            }
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => Open::TableCell,
            Tag::Emphasis => Open::Emphasis,
            Tag::Strong => Open::Strong,
            Tag::Strikethrough => Open::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Open::Link {
                href: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Open::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
            },
            _ => Open::Passthrough,
        };
        self.stack.push(Frame::new(open));
    }

    /// Close the container ended by the parser, first closing any `<Callout>`
    /// left open inside it.
    fn end(&mut self) {
        while matches!(self.top().map(|f| &f.open), Some(Open::TagCallout(_))) {
            self.close();
        }
        self.close();
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let Frame {
            open,
            children,
            raw,
        } = frame;

        match open {
            Open::Root => {}
            Open::Heading { level, id } => {
                let text = plain_text(&children).trim().to_string();
                let base = id.unwrap_or_else(|| slugify(&text));
                let id = self.ids.claim(&base);
                self.headings.push(TocEntry {
                    level,
                    text,
                    id: id.clone(),
                });
                self.push(Node::Heading {
                    level,
                    id,
                    children,
                });
            }
            Open::Paragraph => {
                if is_figure_only(&children) {
                    for child in children {
                        if matches!(child, Node::Image { .. }) {
                            self.push(child);
                        }
                    }
                } else {
                    self.push(Node::Paragraph { children });
                }
            }
            Open::Emphasis => self.push(Node::Emphasis { children }),
            Open::Strong => self.push(Node::Strong { children }),
            Open::Strikethrough => self.push(Node::Strikethrough { children }),
            Open::Link { href, title } => self.push(Node::Link {
                kind: LinkKind::classify(&href),
                href,
                title: non_empty(title),
                children,
            }),
            Open::Image { src, title } => self.push(Node::Image {
                src,
                alt: plain_text(&children),
                title: non_empty(title),
            }),
            Open::CodeBlock { lang } => {
                let html = self.highlighter.highlight(&raw, lang.as_deref());
                self.push(Node::CodeBlock(CodeBlock {
                    lang,
                    code: raw,
                    html,
                }));
            }
            Open::List(start) => self.push(Node::List {
                start,
                items: children,
            }),
            Open::Item { checked } => self.push(Node::ListItem { checked, children }),
            Open::BlockQuote => self.push(Node::BlockQuote { children }),
            Open::Callout(kind) | Open::TagCallout(kind) => {
                self.push(Node::Callout { kind, children });
            }
            Open::HtmlBlock => self.html_block(raw),
            Open::Table(alignments) => self.push(Node::Table {
                alignments,
                rows: children,
            }),
            Open::TableHead => self.push(Node::TableRow {
                header: true,
                cells: children,
            }),
            Open::TableRow => self.push(Node::TableRow {
                header: false,
                cells: children,
            }),
            Open::TableCell => self.push(Node::TableCell { children }),
            Open::Passthrough => {
                for child in children {
                    self.push(child);
                }
            }
        }
    }

    /// `<Callout>` tags arrive as standalone HTML blocks and open or close a container.
    fn html_block(&mut self, raw: String) {
        match parse_callout_tag(&raw) {
            Some(CalloutTag::Open(kind)) => self.stack.push(Frame::new(Open::TagCallout(kind))),
            Some(CalloutTag::Close)
                if matches!(self.top().map(|f| &f.open), Some(Open::TagCallout(_))) =>
            {
                self.close();
            }
            _ => self.push(Node::Html { value: raw }),
        }
    }

    fn text(&mut self, text: &str) {
        let Some(frame) = self.top_mut() else {
            return;
        };

        if matches!(frame.open, Open::CodeBlock { .. } | Open::HtmlBlock) {
            frame.raw.push_str(text);
            return;
        }

        if let Some(Node::Text { value }) = frame.children.last_mut() {
            value.push_str(text);
        } else {
            frame.children.push(Node::text(text));
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.top_mut() {
            frame.children.push(node);
        }
    }

    fn top(&self) -> Option<&Frame> {
        self.stack.last()
    }

    fn top_mut(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    fn finish(mut self) -> Document {
        // Unclosed callouts end with the document.
        while self.stack.len() > 1 {
            self.close();
        }
        let nodes = self
            .stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default();

        Document {
            nodes,
            headings: self.headings,
        }
    }
}

fn callout_for_alert(kind: BlockQuoteKind) -> CalloutKind {
    match kind {
        BlockQuoteKind::Note | BlockQuoteKind::Important => CalloutKind::Info,
        BlockQuoteKind::Tip => CalloutKind::Success,
        BlockQuoteKind::Warning | BlockQuoteKind::Caution => CalloutKind::Warning,
    }
}

fn convert_alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

/// First token of a fence info string, e.g. `rust` in ```` ```rust,ignore ````.
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A paragraph holding only images (and whitespace) renders as bare figures.
fn is_figure_only(children: &[Node]) -> bool {
    children.iter().any(|c| matches!(c, Node::Image { .. }))
        && children.iter().all(|c| match c {
            Node::Image { .. } | Node::SoftBreak => true,
            Node::Text { value } => value.trim().is_empty(),
            _ => false,
        })
}

#[derive(Debug, PartialEq, Eq)]
enum CalloutTag {
    Open(CalloutKind),
    Close,
}

fn parse_callout_tag(raw: &str) -> Option<CalloutTag> {
    let tag = raw.trim();
    if tag == "</Callout>" {
        return Some(CalloutTag::Close);
    }

    let attrs = tag.strip_prefix("<Callout")?.strip_suffix('>')?;
    if !(attrs.is_empty() || attrs.starts_with(char::is_whitespace)) || attrs.ends_with('/') {
        return None;
    }

    let kind = attr_value(attrs, "type")
        .map(CalloutKind::from_name)
        .unwrap_or_default();
    Some(CalloutTag::Open(kind))
}

fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let start = attrs.find(&format!("{name}="))? + name.len() + 1;
    let rest = &attrs[start..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

/// Put every `<Callout>` / `</Callout>` tag on its own line surrounded by blank
/// lines so the markdown parser reports it as a standalone HTML block and
/// parses the content in between as markdown. Fenced code is left untouched.
fn isolate_callout_tags(body: &str) -> Cow<'_, str> {
    if !body.contains("Callout") {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len() + 32);
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if let Some((open, inner)) = split_inline_callout(trimmed) {
            out.push('\n');
            out.push_str(open);
            out.push_str("\n\n");
            out.push_str(inner);
            out.push_str("\n\n</Callout>\n\n");
            continue;
        } else if parse_callout_tag(trimmed).is_some() {
            out.push('\n');
            out.push_str(trimmed);
            out.push_str("\n\n");
            continue;
        }

        out.push_str(line);
        out.push('\n');
    }

    Cow::Owned(out)
}

/// Split `<Callout ...>text</Callout>` written on one line.
fn split_inline_callout(line: &str) -> Option<(&str, &str)> {
    let without_close = line.strip_suffix("</Callout>")?;
    let open_end = without_close.find('>')? + 1;
    let (open, inner) = without_close.split_at(open_end);
    parse_callout_tag(open)?;
    Some((open, inner.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(body: &str) -> Document {
        MarkdownRenderer::new().render(body)
    }

    #[test]
    fn test_headings_get_slug_ids() {
        let doc = render("# Hello World\n\n## Getting Started\n\n### Step 1: Install\n");

        let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["hello-world", "getting-started", "step-1-install"]);
        assert!(matches!(
            &doc.nodes[0],
            Node::Heading { level: 1, id, .. } if id == "hello-world"
        ));
    }

    #[test]
    fn test_duplicate_headings_are_unique() {
        let doc = render("## Setup\n\n## Setup\n");
        let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1"]);
    }

    #[test]
    fn test_explicit_heading_id() {
        let doc = render("## Install {#install-guide}\n");
        assert_eq!(doc.headings[0].id, "install-guide");
        assert_eq!(doc.headings[0].text, "Install");
    }

    #[test]
    fn test_heading_text_includes_inline_code() {
        let doc = render("## Using `cargo` Today\n");
        assert_eq!(doc.headings[0].text, "Using cargo Today");
        assert_eq!(doc.headings[0].id, "using-cargo-today");
    }

    #[test]
    fn test_link_classification() {
        let doc = render("[home](/about) [top](#intro) [rust](https://rust-lang.org)\n");
        let Node::Paragraph { children } = &doc.nodes[0] else {
            panic!("expected paragraph, got {:?}", doc.nodes[0]);
        };

        let kinds: Vec<_> = children
            .iter()
            .filter_map(|n| match n {
                Node::Link { kind, href, .. } => Some((*kind, href.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (LinkKind::Internal, "/about"),
                (LinkKind::Anchor, "#intro"),
                (LinkKind::External, "https://rust-lang.org"),
            ]
        );
    }

    #[test]
    fn test_code_block_keeps_raw_text() {
        let doc = render("```rust\nlet x = 1 < 2;\n```\n");
        let Node::CodeBlock(block) = &doc.nodes[0] else {
            panic!("expected code block");
        };

        assert_eq!(block.lang.as_deref(), Some("rust"));
        assert_eq!(block.code, "let x = 1 < 2;\n");
        assert!(block.html.starts_with("<pre"));
    }

    #[test]
    fn test_fence_language_info_string() {
        assert_eq!(fence_language("rust,ignore"), Some("rust".to_string()));
        assert_eq!(fence_language("ts title=\"a.ts\""), Some("ts".to_string()));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_callout_component() {
        let body = "Intro\n<Callout type=\"warning\">\nMind the **gap**.\n</Callout>\nOutro\n";
        let doc = render(body);

        let callout = doc
            .nodes
            .iter()
            .find(|n| matches!(n, Node::Callout { .. }))
            .expect("callout");
        let Node::Callout { kind, children } = callout else {
            unreachable!()
        };
        assert_eq!(*kind, CalloutKind::Warning);
        assert_eq!(plain_text(children), "Mind the gap.");
        assert_eq!(doc.nodes.len(), 3);
    }

    #[test]
    fn test_callout_on_one_line() {
        let doc = render("<Callout type=\"success\">Shipped!</Callout>\n");
        assert!(matches!(
            &doc.nodes[0],
            Node::Callout { kind: CalloutKind::Success, children } if plain_text(children) == "Shipped!"
        ));
    }

    #[test]
    fn test_callout_without_type_is_info() {
        let doc = render("<Callout>\n\nNote this.\n\n</Callout>\n");
        assert!(matches!(
            &doc.nodes[0],
            Node::Callout {
                kind: CalloutKind::Info,
                ..
            }
        ));
    }

    #[test]
    fn test_unclosed_callout_ends_with_document() {
        let doc = render("<Callout type=\"info\">\n\nDangling\n");
        assert_eq!(doc.nodes.len(), 1);
        assert!(matches!(&doc.nodes[0], Node::Callout { .. }));
    }

    #[test]
    fn test_callout_inside_code_fence_is_literal() {
        let doc = render("```mdx\n<Callout type=\"info\">\nHi\n</Callout>\n```\n");
        let Node::CodeBlock(block) = &doc.nodes[0] else {
            panic!("expected code block");
        };
        assert_eq!(block.code, "<Callout type=\"info\">\nHi\n</Callout>\n");
    }

    #[test]
    fn test_gfm_alert_becomes_callout() {
        let doc = render("> [!TIP]\n> Use rayon.\n");
        assert!(matches!(
            &doc.nodes[0],
            Node::Callout {
                kind: CalloutKind::Success,
                ..
            }
        ));
    }

    #[test]
    fn test_plain_blockquote() {
        let doc = render("> quoted\n");
        assert!(matches!(&doc.nodes[0], Node::BlockQuote { .. }));
    }

    #[test]
    fn test_standalone_image_is_not_wrapped() {
        let doc = render("![A diagram](/img/diagram.png \"Flow\")\n");
        assert_eq!(
            doc.nodes[0],
            Node::Image {
                src: "/img/diagram.png".to_string(),
                alt: "A diagram".to_string(),
                title: Some("Flow".to_string()),
            }
        );
    }

    #[test]
    fn test_table() {
        let doc = render("| Name | Score |\n| :--- | ---: |\n| a | 1 |\n| b | 2 |\n");
        let Node::Table { alignments, rows } = &doc.nodes[0] else {
            panic!("expected table");
        };

        assert_eq!(alignments, &vec![Alignment::Left, Alignment::Right]);
        assert_eq!(rows.len(), 3);
        assert!(matches!(&rows[0], Node::TableRow { header: true, cells } if cells.len() == 2));
        assert!(matches!(&rows[2], Node::TableRow { header: false, .. }));
        assert_eq!(rows[2].plain_text(), "b2");
    }

    #[test]
    fn test_lists_and_tasks() {
        let doc = render("3. three\n4. four\n\n- [x] done\n- [ ] todo\n");

        assert!(matches!(&doc.nodes[0], Node::List { start: Some(3), items } if items.len() == 2));
        let Node::List { start: None, items } = &doc.nodes[1] else {
            panic!("expected bullet list");
        };
        assert!(matches!(&items[0], Node::ListItem { checked: Some(true), .. }));
        assert!(matches!(&items[1], Node::ListItem { checked: Some(false), .. }));
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let doc = render("don't stop\n");
        assert_eq!(
            doc.nodes[0],
            Node::Paragraph {
                children: vec![Node::text("don't stop")],
            }
        );
    }

    #[test]
    fn test_parse_callout_tag() {
        assert_eq!(
            parse_callout_tag("<Callout type='warning'>"),
            Some(CalloutTag::Open(CalloutKind::Warning))
        );
        assert_eq!(parse_callout_tag("</Callout>\n"), Some(CalloutTag::Close));
        assert_eq!(parse_callout_tag("<CalloutBox>"), None);
        assert_eq!(parse_callout_tag("<Callout />"), None);
        assert_eq!(parse_callout_tag("<div>"), None);
    }

    #[test]
    fn test_with_unknown_theme() {
        assert!(MarkdownRenderer::with_theme("missing").is_err());
    }
}
