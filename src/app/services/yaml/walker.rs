use crate::app::domain::styled::{Rgb, StyleRole, StyledText, TextStyle};

use super::key_order::sorted_entries;
use super::value::{ScalarKind, YamlValue};

pub const NULL_KEY: &str = "NULL KEY";
pub const NULL_VALUE: &str = "NULL VALUE";

/// Styling shared by every node of a render pass. Fonts only matter for
/// HTML output and live in `PageSetup`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContext {
    /// Spaces added for each nesting level under a mapping key
    pub indent_step: usize,
    pub key_color: Rgb,
    pub value_color: Rgb,
}

impl StyleContext {
    pub fn new(indent_step: usize, key_color: Rgb, value_color: Rgb) -> Self {
        Self {
            indent_step,
            key_color,
            value_color,
        }
    }

    fn key_style(&self) -> TextStyle {
        TextStyle::role(StyleRole::Key)
            .with_foreground(self.key_color)
            .bold()
    }

    fn value_style(&self) -> TextStyle {
        TextStyle::role(StyleRole::Value).with_foreground(self.value_color)
    }

    fn placeholder_style(&self, is_key: bool) -> TextStyle {
        let color = if is_key { self.key_color } else { self.value_color };
        TextStyle::role(StyleRole::Placeholder)
            .with_foreground(color)
            .italic()
    }

    fn punctuation_style(&self) -> TextStyle {
        TextStyle::role(StyleRole::Punctuation).with_foreground(self.key_color)
    }

    /// Render one node.
    ///
    /// Values end with a line break. A key is written without one, leaving
    /// the caller to add the separator before its value.
    pub fn render(&self, value: &YamlValue, indent: usize, is_key: bool) -> StyledText {
        let mut out = StyledText::new();
        self.render_into(&mut out, value, indent, is_key);
        out
    }

    fn render_into(&self, out: &mut StyledText, value: &YamlValue, indent: usize, is_key: bool) {
        if is_key {
            self.render_key(out, value, indent);
            return;
        }
        match value {
            YamlValue::Sequence(items) if !items.is_empty() => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 && !item.is_scalar() {
                        out.push("\n", TextStyle::default());
                    }
                    self.render_into(out, item, indent, false);
                }
            }
            YamlValue::Mapping(entries) if !entries.is_empty() => {
                for (key, item) in sorted_entries(entries) {
                    self.render_key(out, key, indent);
                    if item.is_nonempty_collection() {
                        out.push(":\n", self.punctuation_style());
                        self.render_into(out, item, indent + self.indent_step, false);
                    } else {
                        out.push(": ", self.punctuation_style());
                        self.render_scalar(out, item, 0, indent + self.indent_step, false);
                    }
                }
            }
            _ => self.render_scalar(out, value, indent, indent, false),
        }
    }

    /// Keys always occupy a single line; collection keys use flow style.
    fn render_key(&self, out: &mut StyledText, key: &YamlValue, indent: usize) {
        if key.is_scalar() {
            self.render_scalar(out, key, indent, indent, true);
        } else {
            let flow = YamlValue::string(key.flow_text());
            self.render_scalar(out, &flow, indent, indent, true);
        }
    }

    fn render_scalar(
        &self,
        out: &mut StyledText,
        value: &YamlValue,
        first_indent: usize,
        rest_indent: usize,
        is_key: bool,
    ) {
        let (text, style) = match value {
            YamlValue::Scalar(scalar) if scalar.kind == ScalarKind::Null => {
                let label = if is_key { NULL_KEY } else { NULL_VALUE };
                (label.to_string(), self.placeholder_style(is_key))
            }
            YamlValue::Sequence(items) if items.is_empty() => ("[]".to_string(), self.value_style()),
            YamlValue::Mapping(entries) if entries.is_empty() => {
                ("{}".to_string(), self.value_style())
            }
            other => {
                let style = if is_key { self.key_style() } else { self.value_style() };
                (other.flow_text(), style)
            }
        };

        let mut body = String::new();
        let trimmed = text.trim();
        if is_key {
            // Line breaks inside a key would split the key from its value
            let joined: Vec<&str> = trimmed.lines().map(str::trim).collect();
            body.push_str(&" ".repeat(first_indent));
            body.push_str(&joined.join(" "));
        } else {
            for (i, line) in trimmed.lines().enumerate() {
                let pad = if i == 0 { first_indent } else { rest_indent };
                body.push_str(&" ".repeat(pad));
                body.push_str(line.trim_end());
                body.push('\n');
            }
            if trimmed.is_empty() {
                body.push_str(&" ".repeat(first_indent));
                body.push('\n');
            }
        }

        // Leading indentation stays unstyled so underlines and backgrounds
        // start at the text.
        let text_start = body.len() - body.trim_start_matches(' ').len();
        out.push(&body[..text_start], TextStyle::default());
        out.push(&body[text_start..], style);
    }
}
