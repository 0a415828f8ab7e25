use pulldown_cmark::{html, Options, Parser};

/// Service for handling markdown rendering
#[derive(Debug, Clone, Copy)]
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    /// Create a new markdown service with smart punctuation enabled
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Self { options }
    }

    /// Convert Markdown to HTML. Pure: the same input always yields the same output.
    pub fn render(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, self.options);
        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        let html = MarkdownService::new().render("# Hi");
        assert_eq!(html, "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_smart_punctuation() {
        let html = MarkdownService::new().render("\"quoted\" -- and --- done...");
        assert!(html.contains('\u{201c}'), "{html}");
        assert!(html.contains('\u{201d}'), "{html}");
        assert!(html.contains('\u{2013}'), "{html}");
        assert!(html.contains('\u{2014}'), "{html}");
        assert!(html.contains('\u{2026}'), "{html}");
    }

    #[test]
    fn test_tables() {
        let html = MarkdownService::new().render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let service = MarkdownService::new();
        let md = "# Title\n\nSome *text* with a [link](/view/Other).\n\n- one\n- two\n";
        assert_eq!(service.render(md), service.render(md));
    }
}
