//! HTML output for the content tree.
//!
//! Rendering goes through a table mapping each [`NodeKind`] to a render
//! function. The table is filled once in [`HtmlRenderer::new`]; callers can
//! swap individual strategies with [`HtmlRenderer::register`].

use std::collections::HashMap;

use crate::node::{Node, NodeKind};

/// Render strategy for one node kind.
pub type RenderFn = fn(&HtmlRenderer, &Node, &mut String);

/// Dispatch-table HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    handlers: HashMap<NodeKind, RenderFn>,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    /// Create a renderer with the built-in strategies.
    pub fn new() -> Self {
        let mut renderer = Self {
            handlers: HashMap::new(),
        };

        renderer.register(NodeKind::Heading, render_heading);
        renderer.register(NodeKind::Paragraph, |r, n, out| r.wrap("p", n, out));
        renderer.register(NodeKind::Text, render_text);
        renderer.register(NodeKind::Emphasis, |r, n, out| r.wrap("em", n, out));
        renderer.register(NodeKind::Strong, |r, n, out| r.wrap("strong", n, out));
        renderer.register(NodeKind::Strikethrough, |r, n, out| r.wrap("del", n, out));
        renderer.register(NodeKind::InlineCode, render_inline_code);
        renderer.register(NodeKind::Link, render_link);
        renderer.register(NodeKind::Image, render_image);
        renderer.register(NodeKind::CodeBlock, render_code_block);
        renderer.register(NodeKind::List, render_list);
        renderer.register(NodeKind::ListItem, render_list_item);
        renderer.register(NodeKind::BlockQuote, |r, n, out| r.wrap("blockquote", n, out));
        renderer.register(NodeKind::Callout, render_callout);
        renderer.register(NodeKind::Table, render_table);
        renderer.register(NodeKind::TableRow, render_table_row);
        renderer.register(NodeKind::TableCell, |r, n, out| r.wrap("td", n, out));
        renderer.register(NodeKind::Rule, |_, _, out| out.push_str("<hr />\n"));
        renderer.register(NodeKind::SoftBreak, |_, _, out| out.push('\n'));
        renderer.register(NodeKind::HardBreak, |_, _, out| out.push_str("<br />\n"));
        renderer.register(NodeKind::Html, render_raw_html);

        renderer
    }

    /// Replace the strategy for `kind`, returning the previous one.
    pub fn register(&mut self, kind: NodeKind, render: RenderFn) -> Option<RenderFn> {
        self.handlers.insert(kind, render)
    }

    /// Render a node list to an HTML string.
    pub fn render(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        self.render_nodes(nodes, &mut out);
        out
    }

    /// Render a node list into `out`.
    pub fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            self.render_node(node, out);
        }
    }

    /// Render one node through its registered strategy.
    pub fn render_node(&self, node: &Node, out: &mut String) {
        if let Some(render) = self.handlers.get(&node.kind()) {
            render(self, node, out);
        }
    }

    /// Render `node`'s children inside `<tag>...</tag>`.
    pub fn wrap(&self, tag: &str, node: &Node, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        self.render_nodes(node.children(), out);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        if is_block(tag) {
            out.push('\n');
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(tag, "p" | "blockquote" | "td" | "th" | "li")
}

fn render_heading(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::Heading {
        level,
        id,
        children,
    } = node
    else {
        return;
    };
    let id = escape_html(id);
    out.push_str(&format!("<h{level} id=\"{id}\"><a href=\"#{id}\">"));
    r.render_nodes(children, out);
    out.push_str(&format!("</a></h{level}>\n"));
}

fn render_text(_: &HtmlRenderer, node: &Node, out: &mut String) {
    if let Node::Text { value } = node {
        out.push_str(&escape_html(value));
    }
}

fn render_inline_code(_: &HtmlRenderer, node: &Node, out: &mut String) {
    if let Node::InlineCode { value } = node {
        out.push_str(&format!("<code>{}</code>", escape_html(value)));
    }
}

fn render_link(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::Link {
        kind,
        href,
        title,
        children,
    } = node
    else {
        return;
    };

    out.push_str(&format!("<a href=\"{}\"", escape_html(href)));
    if let Some(title) = title {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    if let Some(target) = kind.target() {
        out.push_str(&format!(" target=\"{target}\""));
    }
    if let Some(rel) = kind.rel() {
        out.push_str(&format!(" rel=\"{rel}\""));
    }
    out.push('>');
    r.render_nodes(children, out);
    out.push_str("</a>");
}

fn render_image(_: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::Image { src, alt, title } = node else {
        return;
    };

    let alt = escape_html(alt);
    out.push_str("<figure>");
    out.push_str(&format!(
        "<img src=\"{}\" alt=\"{alt}\" loading=\"lazy\"",
        escape_html(src)
    ));
    if let Some(title) = title {
        out.push_str(&format!(" title=\"{}\"", escape_html(title)));
    }
    out.push_str(" />");
    if !alt.is_empty() {
        out.push_str(&format!("<figcaption>{alt}</figcaption>"));
    }
    out.push_str("</figure>\n");
}

fn render_code_block(_: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::CodeBlock(block) = node else {
        return;
    };

    out.push_str("<div class=\"code-block\"");
    if let Some(lang) = &block.lang {
        out.push_str(&format!(" data-language=\"{}\"", escape_html(lang)));
    }
    out.push('>');
    out.push_str(&block.html);
    out.push_str("</div>\n");
}

fn render_list(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::List { start, items } = node else {
        return;
    };

    match start {
        Some(1) => out.push_str("<ol>\n"),
        Some(n) => out.push_str(&format!("<ol start=\"{n}\">\n")),
        None => out.push_str("<ul>\n"),
    }
    r.render_nodes(items, out);
    out.push_str(if start.is_some() { "</ol>\n" } else { "</ul>\n" });
}

fn render_list_item(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::ListItem { checked, children } = node else {
        return;
    };

    out.push_str("<li>");
    match checked {
        Some(true) => out.push_str("<input type=\"checkbox\" checked disabled /> "),
        Some(false) => out.push_str("<input type=\"checkbox\" disabled /> "),
        None => {}
    }
    r.render_nodes(children, out);
    out.push_str("</li>\n");
}

fn render_callout(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::Callout { kind, children } = node else {
        return;
    };

    out.push_str(&format!(
        "<div class=\"callout callout-{}\" role=\"note\">\n",
        kind.as_str()
    ));
    r.render_nodes(children, out);
    out.push_str("</div>\n");
}

fn render_table(r: &HtmlRenderer, node: &Node, out: &mut String) {
    let Node::Table { alignments, rows } = node else {
        return;
    };

    out.push_str("<div class=\"table-wrapper\"><table>\n");

    let (head, body): (Vec<_>, Vec<_>) = rows
        .iter()
        .partition(|row| matches!(row, Node::TableRow { header: true, .. }));

    for (section, rows) in [("thead", head), ("tbody", body)] {
        if rows.is_empty() {
            continue;
        }
        out.push_str(&format!("<{section}>\n"));
        for row in rows {
            render_aligned_row(r, row, alignments, out);
        }
        out.push_str(&format!("</{section}>\n"));
    }

    out.push_str("</table></div>\n");
}

fn render_table_row(r: &HtmlRenderer, node: &Node, out: &mut String) {
    render_aligned_row(r, node, &[], out);
}

fn render_aligned_row(
    r: &HtmlRenderer,
    row: &Node,
    alignments: &[crate::node::Alignment],
    out: &mut String,
) {
    let Node::TableRow { header, cells } = row else {
        return;
    };
    let tag = if *header { "th" } else { "td" };

    out.push_str("<tr>");
    for (i, cell) in cells.iter().enumerate() {
        match alignments.get(i).and_then(|a| a.as_css()) {
            Some(align) => out.push_str(&format!("<{tag} style=\"text-align: {align}\">")),
            None => out.push_str(&format!("<{tag}>")),
        }
        r.render_nodes(cell.children(), out);
        out.push_str(&format!("</{tag}>"));
    }
    out.push_str("</tr>\n");
}

fn render_raw_html(_: &HtmlRenderer, node: &Node, out: &mut String) {
    if let Node::Html { value } = node {
        out.push_str(value);
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
