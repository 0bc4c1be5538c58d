//! Markdown to HTML conversion.

use std::path::Path;

use pulldown_cmark::{Options, Parser, html};

use super::{Converter, expand_home};
use crate::error::ConvertError;

/// Renders Markdown with `pulldown-cmark`.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
    options: Options,
}

impl MarkdownConverter {
    /// Render Markdown text to an HTML fragment.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let markdown = std::fs::read_to_string(expand_home(path))?;
        Ok(self.render(&markdown))
    }
}
