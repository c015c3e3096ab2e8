use syntect::highlighting::{
    FontStyle, HighlightIterator, HighlightState, Highlighter, Style, Theme,
};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use crate::app::domain::styled::{Rgb, StyleRole, StyledText, TextStyle};
use crate::app::services::text_ops::{expand_tabs, line_number_width};

/// Per-call highlighting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightOptions {
    pub tab_size: usize,
    pub line_numbers: bool,
    /// Color of the line number gutter
    pub gutter: Rgb,
}

/// Full highlight of the document text.
pub fn highlight_full(
    text: &str,
    syntax: &SyntaxReference,
    syntax_set: &SyntaxSet,
    theme: &Theme,
    options: &HighlightOptions,
) -> StyledText {
    let highlighter = Highlighter::new(theme);
    let mut parse_state = ParseState::new(syntax);
    let mut highlight_state = HighlightState::new(&highlighter, ScopeStack::new());
    let mut out = StyledText::new();

    let total_lines = LinesWithEndings::new(text).count();
    let width = line_number_width(total_lines);
    let gutter_style = TextStyle::role(StyleRole::LineNumber).with_foreground(options.gutter);

    for (idx, line) in LinesWithEndings::new(text).enumerate() {
        if options.line_numbers {
            out.push(format!("{:>width$} ", idx + 1, width = width), gutter_style);
        }

        let ops = match parse_state.parse_line(line, syntax_set) {
            Ok(ops) => ops,
            Err(e) => {
                log::warn!("Parse error on line {}: {}", idx + 1, e);
                Vec::new()
            }
        };
        let mut column = 0;
        let iter = HighlightIterator::new(&mut highlight_state, &ops, line, &highlighter);
        for (style, piece) in iter {
            let (expanded, next_column) = expand_tabs(piece, options.tab_size, column);
            column = next_column;
            out.push(expanded, style_to_text_style(style));
        }
    }

    out
}

fn style_to_text_style(style: Style) -> TextStyle {
    let fg = style.foreground;
    TextStyle {
        role: StyleRole::Plain,
        foreground: Some(Rgb::new(fg.r, fg.g, fg.b)),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
    }
}

/// Iterator that yields lines including their line endings.
pub(super) struct LinesWithEndings<'a> {
    text: &'a str,
}

impl<'a> LinesWithEndings<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Iterator for LinesWithEndings<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.text.is_empty() {
            return None;
        }
        let end = self.text.find('\n').map(|i| i + 1).unwrap_or(self.text.len());
        let line = &self.text[..end];
        self.text = &self.text[end..];
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_with_endings() {
        let lines: Vec<&str> = LinesWithEndings::new("a\nb\n\nc").collect();
        assert_eq!(lines, vec!["a\n", "b\n", "\n", "c"]);
        assert_eq!(LinesWithEndings::new("").count(), 0);
    }

    #[test]
    fn test_style_conversion_keeps_font_style() {
        let style = Style {
            foreground: syntect::highlighting::Color { r: 1, g: 2, b: 3, a: 255 },
            background: syntect::highlighting::Color::WHITE,
            font_style: FontStyle::BOLD | FontStyle::ITALIC,
        };
        let converted = style_to_text_style(style);
        assert_eq!(converted.foreground, Some(Rgb::new(1, 2, 3)));
        assert!(converted.bold);
        assert!(converted.italic);
        assert!(!converted.underline);
    }
}
