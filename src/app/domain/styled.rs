//! Styled text model shared by the YAML renderer, the syntax highlighter
//! and the output encoders.
//!
//! A [`StyledText`] is a flat list of fragments. Each fragment is either a
//! run of text carrying a [`TextStyle`], or a horizontal rule that occupies
//! a line of its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            3 => {
                let mut parts = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    parts[i] = v * 17;
                }
                Some(Self::new(parts[0], parts[1], parts[2]))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0.0..=1.0.
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    pub fn is_dark(self) -> bool {
        self.luminance() < 0.5
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// What a run of text represents. Encoders use the role when a run carries
/// no explicit foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleRole {
    #[default]
    Plain,
    Key,
    Value,
    Punctuation,
    Placeholder,
    Error,
    LineNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub role: StyleRole,
    pub foreground: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub fn role(role: StyleRole) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    pub fn with_foreground(mut self, color: Rgb) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Run(TextRun),
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    fragments: Vec<Fragment>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-run text.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let mut out = Self::new();
        out.push(text, style);
        out
    }

    /// Append a run. Empty strings are dropped and a run with the same style
    /// as the previous one is merged into it.
    pub fn push(&mut self, text: impl Into<String>, style: TextStyle) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Fragment::Run(last)) = self.fragments.last_mut()
            && last.style == style
        {
            last.text.push_str(&text);
            return;
        }
        self.fragments.push(Fragment::Run(TextRun { text, style }));
    }

    pub fn push_rule(&mut self) {
        self.fragments.push(Fragment::Rule);
    }

    pub fn append(&mut self, other: StyledText) {
        for fragment in other.fragments {
            match fragment {
                Fragment::Run(run) => self.push(run.text, run.style),
                Fragment::Rule => self.push_rule(),
            }
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Text content without styling. Rules are written as `---` on a line of
    /// their own.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Run(run) => out.push_str(&run.text),
                Fragment::Rule => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("---\n");
                }
            }
        }
        out
    }

    /// Number of visual lines, counting a rule as one line.
    pub fn line_count(&self) -> usize {
        let mut lines = 0;
        let mut open_line = false;
        for fragment in &self.fragments {
            match fragment {
                Fragment::Run(run) => {
                    for segment in run.text.split_inclusive('\n') {
                        if segment.ends_with('\n') {
                            lines += 1;
                            open_line = false;
                        } else {
                            open_line = true;
                        }
                    }
                }
                Fragment::Rule => {
                    if open_line {
                        lines += 1;
                        open_line = false;
                    }
                    lines += 1;
                }
            }
        }
        if open_line { lines + 1 } else { lines }
    }

    /// Keep at most `max_lines` lines. Returns true when anything was cut.
    pub fn truncate_lines(&mut self, max_lines: usize) -> bool {
        let mut lines = 0;
        let mut open_line = false;
        for idx in 0..self.fragments.len() {
            if lines >= max_lines {
                self.fragments.truncate(idx);
                return true;
            }
            match &mut self.fragments[idx] {
                Fragment::Run(run) => {
                    let mut keep = 0;
                    for segment in run.text.split_inclusive('\n') {
                        keep += segment.len();
                        if segment.ends_with('\n') {
                            lines += 1;
                            open_line = false;
                            if lines >= max_lines {
                                break;
                            }
                        } else {
                            open_line = true;
                        }
                    }
                    if keep < run.text.len() {
                        run.text.truncate(keep);
                        self.fragments.truncate(idx + 1);
                        return true;
                    }
                }
                Fragment::Rule => {
                    if open_line {
                        lines += 1;
                        open_line = false;
                    }
                    if lines >= max_lines {
                        self.fragments.truncate(idx);
                        return true;
                    }
                    lines += 1;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_round_trip() {
        let c = Rgb::from_hex("#ff6b35").unwrap();
        assert_eq!(c, Rgb::new(0xff, 0x6b, 0x35));
        assert_eq!(c.to_hex(), "#ff6b35");
    }

    #[test]
    fn test_rgb_short_hex() {
        assert_eq!(Rgb::from_hex("fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_rgb_darkness() {
        assert!(Rgb::new(0x2b, 0x30, 0x3b).is_dark());
        assert!(!Rgb::new(0xef, 0xf1, 0xf5).is_dark());
    }

    #[test]
    fn test_push_merges_equal_styles() {
        let mut text = StyledText::new();
        let key = TextStyle::role(StyleRole::Key);
        text.push("a", key);
        text.push("b", key);
        text.push("", TextStyle::role(StyleRole::Value));
        text.push("c", TextStyle::role(StyleRole::Value));
        assert_eq!(text.fragments().len(), 2);
        assert_eq!(text.plain_text(), "abc");
    }

    #[test]
    fn test_plain_text_puts_rule_on_own_line() {
        let mut text = StyledText::new();
        text.push("one", TextStyle::default());
        text.push_rule();
        text.push("two\n", TextStyle::default());
        assert_eq!(text.plain_text(), "one\n---\ntwo\n");
    }

    #[test]
    fn test_line_count() {
        let mut text = StyledText::new();
        text.push("a\nb\n", TextStyle::default());
        text.push_rule();
        text.push("c", TextStyle::role(StyleRole::Key));
        assert_eq!(text.line_count(), 4);
    }

    #[test]
    fn test_truncate_lines_mid_run() {
        let mut text = StyledText::new();
        text.push("1\n2\n3\n", TextStyle::default());
        text.push("4\n", TextStyle::role(StyleRole::Key));
        assert!(text.truncate_lines(2));
        assert_eq!(text.plain_text(), "1\n2\n");
        assert_eq!(text.fragments().len(), 1);
    }

    #[test]
    fn test_truncate_lines_at_rule() {
        let mut text = StyledText::new();
        text.push("a\n", TextStyle::default());
        text.push_rule();
        text.push("b\n", TextStyle::default());
        assert!(text.truncate_lines(1));
        assert_eq!(text.plain_text(), "a\n");
    }

    #[test]
    fn test_truncate_lines_noop_when_short() {
        let mut text = StyledText::styled("a\nb\n", TextStyle::default());
        assert!(!text.truncate_lines(5));
        assert_eq!(text.line_count(), 2);
    }
}
