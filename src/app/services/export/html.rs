use crate::app::domain::styled::{Fragment, Rgb, StyledText, TextStyle};

use super::style_map::StyleMap;

/// Everything about the page that is not per-run styling.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub title: String,
    pub background: Rgb,
    pub foreground: Rgb,
    pub font_family: String,
    pub font_size: u32,
    pub word_wrap: bool,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the body of the `<pre>` block and collect the styles it uses.
pub fn to_html_fragment(text: &StyledText, style_map: &mut StyleMap) -> String {
    let mut out = String::new();
    for fragment in text.fragments() {
        match fragment {
            Fragment::Run(run) if run.style == TextStyle::default() => {
                out.push_str(&escape_html(&run.text));
            }
            Fragment::Run(run) => {
                let class = style_map.get_or_insert(run.style);
                out.push_str(&format!(
                    "<span class=\"{}\">{}</span>",
                    class,
                    escape_html(&run.text)
                ));
            }
            Fragment::Rule => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("<hr>");
            }
        }
    }
    out
}

/// Standalone HTML page.
pub fn to_html_page(text: &StyledText, page: &PageSetup) -> String {
    let mut style_map = StyleMap::new();
    let body = to_html_fragment(text, &mut style_map);
    let white_space = if page.word_wrap { "pre-wrap" } else { "pre" };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n\
body {{ background: {bg}; color: {fg}; margin: 0; }}\n\
pre {{ font-family: \"{font}\", monospace; font-size: {size}pt; white-space: {ws}; margin: 0; padding: 8px; }}\n\
hr {{ border: 0; border-top: 1px solid {fg}; opacity: 0.4; margin: 0.5em 0; }}\n\
{classes}</style>\n</head>\n<body>\n<pre>{body}</pre>\n</body>\n</html>\n",
        title = escape_html(&page.title),
        bg = page.background.to_hex(),
        fg = page.foreground.to_hex(),
        font = escape_html(&page.font_family),
        size = page.font_size,
        ws = white_space,
        classes = style_map.stylesheet(),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::styled::StyleRole;

    fn page() -> PageSetup {
        PageSetup {
            title: "a <b>.yaml".to_string(),
            background: Rgb::new(0x2b, 0x30, 0x3b),
            foreground: Rgb::new(0xc0, 0xc5, 0xce),
            font_family: "Menlo".to_string(),
            font_size: 12,
            word_wrap: true,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
    }

    #[test]
    fn test_fragment_spans_and_rules() {
        let mut text = StyledText::new();
        text.push("  ", TextStyle::default());
        text.push("k", TextStyle::role(StyleRole::Key).bold());
        text.push(": 1 < 2\n", TextStyle::role(StyleRole::Value));
        text.push_rule();
        let mut map = StyleMap::new();
        let html = to_html_fragment(&text, &mut map);
        assert_eq!(
            html,
            "  <span class=\"s0\">k</span><span class=\"s1\">: 1 &lt; 2\n</span><hr>"
        );
        assert_eq!(map.entries().len(), 2);
    }

    #[test]
    fn test_page_wraps_content() {
        let text = StyledText::styled("x", TextStyle::role(StyleRole::Key).with_foreground(Rgb::new(1, 2, 3)));
        let html = to_html_page(&text, &page());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>a &lt;b&gt;.yaml</title>"));
        assert!(html.contains("background: #2b303b"));
        assert!(html.contains("white-space: pre-wrap"));
        assert!(html.contains(".s0 { color: #010203 }"));
        assert!(html.contains("<pre><span class=\"s0\">x</span></pre>"));
    }

    #[test]
    fn test_page_without_wrap() {
        let html = to_html_page(&StyledText::new(), &PageSetup { word_wrap: false, ..page() });
        assert!(html.contains("white-space: pre;"));
    }
}
