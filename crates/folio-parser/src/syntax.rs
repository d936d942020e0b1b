//! Syntax highlighting for code blocks.

use syntect::{highlighting::ThemeSet, html::highlighted_html_for_string, parsing::SyntaxSet};
use tracing::debug;

use crate::{ParserError, html::escape_html};

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter for a named bundled theme.
    pub fn new(theme: &str) -> Result<Self, ParserError> {
        let mut highlighter = Self::default();
        highlighter.set_theme(theme)?;
        Ok(highlighter)
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        let mut themes: Vec<_> = self.theme_set.themes.keys().map(String::as_str).collect();
        themes.sort_unstable();
        themes
    }

    /// Name of the active theme.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Switch to another bundled theme.
    pub fn set_theme(&mut self, theme: &str) -> Result<(), ParserError> {
        if !self.theme_set.themes.contains_key(theme) {
            return Err(ParserError::UnknownTheme {
                theme: theme.to_string(),
                available: self.available_themes().join(", "),
            });
        }
        self.theme = theme.to_string();
        Ok(())
    }

    /// Highlight code with the given language.
    ///
    /// Unknown languages and highlighting failures produce a plain escaped
    /// `<pre><code>` block.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l));
        let theme = self.theme_set.themes.get(&self.theme);

        match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
                    Ok(html) => html,
                    Err(e) => {
                        debug!(?lang, error = %e, "highlighting failed, using plain block");
                        plain_block(code, lang)
                    }
                }
            }
            _ => plain_block(code, lang),
        }
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", escape_html(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{}</code></pre>", escape_html(code))
}
