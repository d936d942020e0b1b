//! Structured linked data (schema.org JSON-LD).
//!
//! Author and publisher of every object are always the site owner.

use folio_core::{Collection, DocumentMeta, SiteConfig};
use serde::Serialize;

/// JSON-LD vocabulary.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// A top-level JSON-LD object ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredData {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(flatten)]
    pub item: SchemaItem,
}

/// The supported schema.org types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub enum SchemaItem {
    Person(Person),
    BlogPosting(BlogPosting),
    CreativeWork(CreativeWork),
    BreadcrumbList(BreadcrumbList),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    pub job_title: String,
    pub url: String,
    pub email: String,
    pub image: String,
    pub address: PostalAddress,
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub address_locality: String,
    pub address_country: String,
}

/// Nested reference to a person by name and URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    pub headline: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: PersonRef,
    pub publisher: PersonRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeWork {
    pub name: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub date_created: String,
    pub author: PersonRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

/// One step in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Builds [`StructuredData`] objects for the site owner's pages.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    site: SiteConfig,
}

impl SchemaGenerator {
    #[must_use]
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// The site owner.
    pub fn person(&self) -> StructuredData {
        wrap(SchemaItem::Person(Person {
            name: self.site.name.clone(),
            job_title: self.site.title.clone(),
            url: self.site.url_for(""),
            email: self.site.email.clone(),
            image: self.site.absolute(&self.site.avatar),
            address: PostalAddress {
                kind: "PostalAddress",
                address_locality: self.site.location.clone(),
                address_country: self.site.country.clone(),
            },
            same_as: self.site.links.profiles(),
        }))
    }

    /// Breadcrumb trail with 1-based positions.
    pub fn breadcrumb(&self, items: &[Breadcrumb]) -> StructuredData {
        let item_list_element = items
            .iter()
            .enumerate()
            .map(|(i, crumb)| ListItem {
                kind: "ListItem",
                position: i + 1,
                name: crumb.name.clone(),
                item: crumb.url.clone(),
            })
            .collect();

        wrap(SchemaItem::BreadcrumbList(BreadcrumbList { item_list_element }))
    }

    /// Home, collection index, then the document itself.
    pub fn document_breadcrumb(&self, collection: Collection, meta: &DocumentMeta) -> StructuredData {
        self.breadcrumb(&[
            Breadcrumb::new("Home", self.site.url_for("")),
            Breadcrumb::new(collection.label(), self.site.url_for(collection.route())),
            Breadcrumb::new(
                &meta.title,
                self.site.url_for(&collection.document_route(&meta.slug)),
            ),
        ])
    }

    /// A blog post; `dateModified` falls back to the publication date.
    pub fn blog_post(&self, meta: &DocumentMeta) -> StructuredData {
        let published = meta.date.to_string();
        wrap(SchemaItem::BlogPosting(BlogPosting {
            headline: meta.title.clone(),
            description: meta.description.clone(),
            image: self.image(meta.image.as_deref()),
            url: self.site.url_for(&Collection::Blog.document_route(&meta.slug)),
            date_modified: meta.updated.map_or_else(|| published.clone(), |d| d.to_string()),
            date_published: published,
            author: self.owner(),
            publisher: self.owner(),
            keywords: keywords(&meta.tags),
        }))
    }

    /// A project write-up.
    pub fn project(&self, meta: &DocumentMeta) -> StructuredData {
        wrap(SchemaItem::CreativeWork(CreativeWork {
            name: meta.title.clone(),
            description: meta.description.clone(),
            url: self
                .site
                .url_for(&Collection::Projects.document_route(&meta.slug)),
            image: self.image(meta.image.as_deref()),
            date_created: meta.date.to_string(),
            author: self.owner(),
            keywords: keywords(&meta.tags),
        }))
    }

    fn owner(&self) -> PersonRef {
        PersonRef {
            kind: "Person",
            name: self.site.name.clone(),
            url: self.site.url_for(""),
        }
    }

    fn image(&self, image: Option<&str>) -> String {
        self.site
            .absolute(image.filter(|i| !i.trim().is_empty()).unwrap_or(&self.site.og_image))
    }
}

fn wrap(item: SchemaItem) -> StructuredData {
    StructuredData {
        context: SCHEMA_CONTEXT,
        item,
    }
}

fn keywords(tags: &[String]) -> Option<String> {
    (!tags.is_empty()).then(|| tags.join(", "))
}

impl StructuredData {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Embed as a `<script type="application/ld+json">` element.
    pub fn to_script_tag(&self) -> serde_json::Result<String> {
        // `</` would close the script element early.
        let json = self.to_json()?.replace("</", "<\\/");
        Ok(format!("<script type=\"application/ld+json\">{json}</script>"))
    }
}
