//! Heading anchor ids.

use std::collections::HashMap;

/// Turn heading text into a URL fragment.
///
/// Letters are lowercased, every run of non-alphanumeric characters becomes a
/// single `-`, and separators at either end are dropped. Applying it to its own
/// output returns the same string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Hands out unique anchor ids within one document.
#[derive(Debug, Default)]
pub struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id based on `base`, suffixing `-1`, `-2`, ... on collisions.
    pub fn claim(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };

        let Some(count) = self.seen.get(base).copied() else {
            self.seen.insert(base.to_string(), 0);
            return base.to_string();
        };

        let mut n = count + 1;
        let mut candidate = format!("{base}-{n}");
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.seen.insert(base.to_string(), n);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}
