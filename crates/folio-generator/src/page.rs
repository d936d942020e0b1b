//! Detail page assembly.
//!
//! A detail page combines the rendered body, head metadata, JSON-LD and a
//! table of contents inside a small `{{ variable }}` template.

use std::collections::HashMap;

use folio_core::{Collection, Config, ParsedDocument, PostRecord, ProjectRecord};
use folio_parser::{Document, MarkdownRenderer, ParserError, html::escape_html};
use thiserror::Error;
use tracing::debug;

use crate::{
    schema::{SchemaGenerator, StructuredData},
    seo::{MetadataGenerator, PageSeo},
};

/// Page assembly errors.
#[derive(Debug, Error)]
pub enum PageError {
    /// Missing required template variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),

    /// Structured data could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Renderer setup failed.
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Result type for page assembly.
pub type Result<T> = std::result::Result<T, PageError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A template with `{{ name }}` placeholders; `{{ name? }}` may be absent.
#[derive(Debug, Clone)]
pub struct Template {
    content: String,
}

impl Template {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Substitute every placeholder. Substituted values are not rescanned.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| PageError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;

            let name = after[..end].trim();
            let (name, optional) = match name.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (name, false),
            };

            match context.get(name) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => return Err(PageError::MissingVariable(name.to_string())),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Shell for project and post pages.
pub const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
<meta charset="UTF-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
{{ head }}{{ schema }}
</head>
<body>
<main>
<article class="{{ collection }}">
<header>
<nav class="breadcrumb"><a href="/">Home</a> / <a href="{{ section_url }}">{{ section }}</a></nav>
<h1>{{ title }}</h1>
{{ byline? }}
</header>
{{ toc? }}
<div class="prose">
{{ content }}
</div>
{{ footer? }}
</article>
</main>
</body>
</html>
"#;

/// Renders complete HTML pages for documents.
#[derive(Debug)]
pub struct PageRenderer {
    template: Template,
    markdown: MarkdownRenderer,
    seo: MetadataGenerator,
    schema: SchemaGenerator,
    lang: String,
}

impl PageRenderer {
    /// Create a renderer using the configured highlighting theme.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            template: Template::new(DOCUMENT_TEMPLATE),
            markdown: MarkdownRenderer::with_theme(&config.build.syntax_theme)?,
            seo: MetadataGenerator::new(config.site.clone()),
            schema: SchemaGenerator::new(config.site.clone()),
            lang: html_lang(&config.site.locale),
        })
    }

    /// Replace the page shell.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn render_project(&self, doc: &ParsedDocument<ProjectRecord>) -> Result<String> {
        let project = &doc.record;
        let meta = &project.meta;
        debug!(slug = %meta.slug, "rendering project page");

        let mut byline = format!(
            "<p class=\"meta\"><span class=\"role\">{}</span> · {}</p>",
            escape_html(&project.role),
            date_html(meta.date)
        );
        if !project.stack.is_empty() {
            byline.push('\n');
            byline.push_str(&badges("stack", &project.stack));
        }

        let links: Vec<_> = [("Live demo", &project.demo_url), ("Source", &project.repo_url)]
            .into_iter()
            .filter_map(|(label, url)| {
                url.as_deref().map(|url| {
                    format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{label}</a>",
                        escape_html(url)
                    )
                })
            })
            .collect();

        let mut ctx = self.base_context(
            Collection::Projects,
            &meta.title,
            &PageSeo::for_project(project),
            &[
                self.schema.project(meta),
                self.schema.document_breadcrumb(Collection::Projects, meta),
            ],
            &self.markdown.render(&doc.body),
        )?;
        ctx.insert("byline", byline);
        if !links.is_empty() {
            ctx.insert(
                "footer",
                format!("<footer class=\"links\">{}</footer>", links.join(" ")),
            );
        }

        self.template.render(&ctx)
    }

    pub fn render_post(&self, doc: &ParsedDocument<PostRecord>) -> Result<String> {
        let post = &doc.record;
        let meta = &post.meta;
        debug!(slug = %meta.slug, "rendering post page");

        let mut byline = format!(
            "<p class=\"meta\">{} · {} min read",
            date_html(meta.date),
            post.reading_time
        );
        if let Some(author) = &post.author {
            byline.push_str(&format!(" · {}", escape_html(author)));
        }
        byline.push_str("</p>");
        if !meta.tags.is_empty() {
            byline.push('\n');
            byline.push_str(&badges("tags", &meta.tags));
        }

        let mut ctx = self.base_context(
            Collection::Blog,
            &meta.title,
            &PageSeo::for_post(post),
            &[
                self.schema.blog_post(meta),
                self.schema.document_breadcrumb(Collection::Blog, meta),
            ],
            &self.markdown.render(&doc.body),
        )?;
        ctx.insert("byline", byline);

        self.template.render(&ctx)
    }

    fn base_context(
        &self,
        collection: Collection,
        title: &str,
        seo: &PageSeo,
        schema: &[StructuredData],
        document: &Document,
    ) -> Result<TemplateContext> {
        let person = self.schema.person();
        let scripts = std::iter::once(&person)
            .chain(schema)
            .map(StructuredData::to_script_tag)
            .collect::<serde_json::Result<Vec<_>>>()?
            .join("\n");

        let mut ctx = TemplateContext::new()
            .with_var("lang", &self.lang)
            .with_var("head", self.seo.generate(seo).to_head_html())
            .with_var("schema", scripts)
            .with_var("collection", collection.dir_name())
            .with_var("section", collection.label())
            .with_var("section_url", collection.route())
            .with_var("title", escape_html(title))
            .with_var("content", document.to_html());

        if let Some(toc) = toc_html(document) {
            ctx.insert("toc", toc);
        }

        Ok(ctx)
    }
}

/// `en_US` becomes `en-US`.
fn html_lang(locale: &str) -> String {
    locale.replace('_', "-")
}

fn date_html(date: chrono::NaiveDate) -> String {
    format!(
        "<time datetime=\"{}\">{}</time>",
        date.format("%Y-%m-%d"),
        date.format("%B %-d, %Y")
    )
}

fn badges(class: &str, items: &[String]) -> String {
    let items = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect::<String>();
    format!("<ul class=\"{class}\">{items}</ul>")
}

/// Table of contents for level 2 and 3 headings, `None` when there are none.
fn toc_html(document: &Document) -> Option<String> {
    let entries = document.table_of_contents();
    if entries.is_empty() {
        return None;
    }

    let mut html = String::from("<nav class=\"toc\" aria-label=\"Table of contents\"><ul>\n");
    for entry in entries {
        html.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
    }
    html.push_str("</ul></nav>");
    Some(html)
}
