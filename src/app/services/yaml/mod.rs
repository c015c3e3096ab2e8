//! YAML outline renderer.
//!
//! Every document of a file is parsed up front and rendered as an indented
//! key/value outline. Documents are separated by a horizontal rule. If any
//! document fails to parse, the whole file renders as a single error message
//! instead of a partial outline.

pub mod key_order;
pub mod value;
pub mod walker;

use crate::app::domain::styled::{StyleRole, StyledText, TextStyle};
use crate::app::infrastructure::error::Result;
use crate::app::services::text_ops::decode_text;

pub use value::{Scalar, ScalarKind, YamlValue};
pub use walker::{NULL_KEY, NULL_VALUE, StyleContext};

pub struct YamlRenderer {
    context: StyleContext,
    show_source_on_error: bool,
}

impl YamlRenderer {
    pub fn new(context: StyleContext, show_source_on_error: bool) -> Self {
        Self {
            context,
            show_source_on_error,
        }
    }

    /// Parse every document in `text`. Comments and blank lines alone
    /// produce no documents.
    pub fn parse_documents(text: &str) -> Result<Vec<YamlValue>> {
        value::load_documents(text)
    }

    /// Render decoded text. Parse failures become an error message, never a
    /// partial render.
    pub fn render_documents(&self, text: &str) -> StyledText {
        match Self::parse_documents(text) {
            Ok(documents) => {
                log::debug!("Rendering {} YAML document(s)", documents.len());
                let mut out = StyledText::new();
                for (i, document) in documents.iter().enumerate() {
                    if i > 0 {
                        out.push_rule();
                    }
                    out.append(self.context.render(document, 0, false));
                }
                out
            }
            Err(e) => {
                log::warn!("YAML parse failed: {}", e);
                self.render_error(&e.to_string(), text)
            }
        }
    }

    /// Decode and render raw file bytes. Undecodable input is an error.
    pub fn render_bytes(&self, bytes: &[u8]) -> Result<StyledText> {
        let text = decode_text(bytes, false)?;
        Ok(self.render_documents(&text))
    }

    fn render_error(&self, message: &str, source: &str) -> StyledText {
        let mut out = StyledText::new();
        out.push(
            format!("Error parsing YAML: {}\n", message),
            TextStyle::role(StyleRole::Error).bold(),
        );
        if self.show_source_on_error && !source.is_empty() {
            out.push("\n", TextStyle::default());
            out.push(source, TextStyle::role(StyleRole::Plain));
            if !source.ends_with('\n') {
                out.push("\n", TextStyle::default());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::styled::{Fragment, Rgb};

    fn renderer(show_source: bool) -> YamlRenderer {
        YamlRenderer::new(
            StyleContext::new(2, Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)),
            show_source,
        )
    }

    #[test]
    fn test_multiple_documents_separated_by_rule() {
        let text = renderer(false).render_documents("a: 1\n---\nb: 2\n");
        let rules = text
            .fragments()
            .iter()
            .filter(|f| matches!(f, Fragment::Rule))
            .count();
        assert_eq!(rules, 1);
        assert_eq!(text.plain_text(), "a: 1\n---\nb: 2\n");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert!(renderer(false).render_documents("").is_empty());
        assert!(renderer(false).render_documents("  \n").is_empty());
    }

    #[test]
    fn test_comment_only_renders_nothing() {
        assert!(renderer(false).render_documents("# only a comment\n").is_empty());
        assert!(renderer(false).render_documents("# a\n\n# b\n").is_empty());
        assert_eq!(renderer(false).render_documents("# note\n~\n").plain_text(), "NULL VALUE\n");
    }

    #[test]
    fn test_malformed_document_is_single_error() {
        let text = renderer(false).render_documents("a: 1\n---\nb: [unclosed\n");
        let plain = text.plain_text();
        assert!(plain.starts_with("Error parsing YAML: "));
        assert!(!plain.contains("a: 1"));
        assert_eq!(text.fragments().len(), 1);
        match &text.fragments()[0] {
            Fragment::Run(run) => assert_eq!(run.style.role, StyleRole::Error),
            Fragment::Rule => panic!("unexpected rule"),
        }
    }

    #[test]
    fn test_error_followed_by_source() {
        let source = "key: [oops";
        let plain = renderer(true).render_documents(source).plain_text();
        assert!(plain.starts_with("Error parsing YAML: "));
        assert!(plain.ends_with("\n\nkey: [oops\n"));
    }

    #[test]
    fn test_render_bytes_rejects_invalid_utf8() {
        let err = renderer(false).render_bytes(b"key: \xFF\xFF").unwrap_err();
        assert!(matches!(err, crate::app::infrastructure::error::AppError::Decode(_)));
    }

    #[test]
    fn test_render_bytes_nested() {
        let text = renderer(false)
            .render_bytes(b"server:\n  port: 8080\n  host: localhost\n")
            .unwrap();
        assert_eq!(text.plain_text(), "server:\n  host: localhost\n  port: 8080\n");
    }

    #[test]
    fn test_parse_documents_counts() {
        let docs = YamlRenderer::parse_documents("--- 1\n--- 2\n--- 3\n").unwrap();
        assert_eq!(
            docs,
            vec![YamlValue::plain("1"), YamlValue::plain("2"), YamlValue::plain("3")]
        );
    }
}
