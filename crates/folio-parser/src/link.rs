//! Link classification.

use serde::Serialize;

/// How a link target is handled by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Site route starting with `/`, navigated client side.
    Internal,
    /// In-page fragment starting with `#`.
    Anchor,
    /// Anything else; opened in a new context without referrer.
    External,
}

impl LinkKind {
    /// Classify a link target.
    pub fn classify(href: &str) -> Self {
        if href.starts_with('#') {
            Self::Anchor
        } else if href.starts_with('/') && !href.starts_with("//") {
            Self::Internal
        } else {
            Self::External
        }
    }

    /// `target` attribute for the rendered anchor.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            Self::External => Some("_blank"),
            _ => None,
        }
    }

    /// `rel` attribute for the rendered anchor.
    pub fn rel(&self) -> Option<&'static str> {
        match self {
            Self::External => Some("noopener noreferrer"),
            _ => None,
        }
    }
}
