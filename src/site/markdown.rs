// Markdown to HTML conversion

use pulldown_cmark::{html, Options, Parser};

/// Converts markdown text into an HTML fragment
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with the GitHub table and strikethrough extensions
#[derive(Debug, Clone, Copy)]
pub struct CommonMark {
    options: Options,
}

impl Default for CommonMark {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }
}

impl MarkdownRenderer for CommonMark {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let out = CommonMark::default().render("# Title\n\nSome *text*.\n");
        assert_eq!(out, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_fenced_code() {
        let out = CommonMark::default().render("```php\n$a = 1;\n```\n");
        assert!(out.contains("<code class=\"language-php\">$a = 1;\n</code>"));
    }

    #[test]
    fn test_tables_enabled() {
        let out = CommonMark::default().render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.contains("<table>"));
    }
}
