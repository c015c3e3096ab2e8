use console::{Color, Style};

use crate::app::domain::styled::{Fragment, StyleRole, StyledText, TextStyle};

const RULE_WIDTH: usize = 40;

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

fn console_style(style: &TextStyle) -> Style {
    let mut out = Style::new().force_styling(true);
    match style.foreground {
        Some(rgb) => out = out.fg(Color::Color256(rgb_to_ansi256((rgb.r, rgb.g, rgb.b)))),
        None => match style.role {
            StyleRole::Error => out = out.red(),
            StyleRole::LineNumber => out = out.dim(),
            _ => {}
        },
    }
    if style.bold {
        out = out.bold();
    }
    if style.italic {
        out = out.italic();
    }
    if style.underline {
        out = out.underlined();
    }
    out
}

/// Encode for a 256-color terminal. Styling is applied per line so that a
/// pager never sees an escape sequence spanning a line break.
pub fn to_ansi(text: &StyledText) -> String {
    let mut out = String::new();
    for fragment in text.fragments() {
        match fragment {
            Fragment::Run(run) => {
                let style = console_style(&run.style);
                let plain = run.style == TextStyle::default();
                for segment in run.text.split_inclusive('\n') {
                    let (body, newline) = match segment.strip_suffix('\n') {
                        Some(body) => (body, "\n"),
                        None => (segment, ""),
                    };
                    if plain || body.is_empty() {
                        out.push_str(body);
                    } else {
                        out.push_str(&style.apply_to(body).to_string());
                    }
                    out.push_str(newline);
                }
            }
            Fragment::Rule => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                let line = "─".repeat(RULE_WIDTH);
                out.push_str(&Style::new().force_styling(true).dim().apply_to(line).to_string());
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::styled::Rgb;

    fn strip(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    #[test]
    fn test_rgb_to_ansi256() {
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256((255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256((0, 0, 255)), 21);
    }

    #[test]
    fn test_ansi_keeps_text() {
        let mut text = StyledText::new();
        text.push("key", TextStyle::role(StyleRole::Key).with_foreground(Rgb::new(255, 0, 0)));
        text.push(": ", TextStyle::default());
        text.push("value\nmore\n", TextStyle::role(StyleRole::Value).italic());
        let encoded = to_ansi(&text);
        assert!(encoded.contains("\u{1b}["));
        assert_eq!(strip(&encoded), "key: value\nmore\n");
    }

    #[test]
    fn test_ansi_escape_never_spans_newline() {
        let text = StyledText::styled("a\nb\n", TextStyle::role(StyleRole::Value).bold());
        let encoded = to_ansi(&text);
        for line in encoded.lines() {
            assert!(line.ends_with("\u{1b}[0m"), "unterminated line {:?}", line);
        }
    }

    #[test]
    fn test_ansi_rule() {
        let mut text = StyledText::styled("a", TextStyle::default());
        text.push_rule();
        let stripped = strip(&to_ansi(&text));
        assert_eq!(stripped, format!("a\n{}\n", "─".repeat(RULE_WIDTH)));
    }
}
