//! Markdown rendering

use pulldown_cmark::{html, Event, Options, Parser};

/// Markdown renderer
///
/// Plain CommonMark by default. Output depends only on the input text and
/// the two switches, so repeated renders are byte-identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    gfm: bool,
    raw_html: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom settings
    pub fn with_options(gfm: bool, raw_html: bool) -> Self {
        Self { gfm, raw_html }
    }

    fn options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown.trim(), self.options());

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        if self.raw_html {
            html::push_html(&mut html_output, parser);
        } else {
            let events = parser.filter(|event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) => {
                    tracing::debug!("Dropping raw HTML: {:?}", raw.trim());
                    false
                }
                _ => true,
            });
            html::push_html(&mut html_output, events);
        }

        html_output
    }
}
