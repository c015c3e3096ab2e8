use std::collections::HashMap;

use crate::app::domain::styled::{Rgb, StyleRole, TextStyle};

/// Maps run styles to CSS class names (`s0`, `s1`, ...). The table grows as
/// new styles are encountered and becomes the page stylesheet.
pub struct StyleMap {
    style_to_class: HashMap<TextStyle, usize>,
    entries: Vec<TextStyle>,
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleMap {
    pub fn new() -> Self {
        Self {
            style_to_class: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Get the class name for a style, inserting a new entry if needed.
    pub fn get_or_insert(&mut self, style: TextStyle) -> String {
        if let Some(&idx) = self.style_to_class.get(&style) {
            return class_name(idx);
        }
        let idx = self.entries.len();
        self.entries.push(style);
        self.style_to_class.insert(style, idx);
        class_name(idx)
    }

    pub fn entries(&self) -> &[TextStyle] {
        &self.entries
    }

    /// One CSS rule per entry.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for (idx, style) in self.entries.iter().enumerate() {
            let mut decls = Vec::new();
            if let Some(color) = style.foreground.or_else(|| role_color(style.role)) {
                decls.push(format!("color: {}", color.to_hex()));
            }
            if style.bold {
                decls.push("font-weight: bold".to_string());
            }
            if style.italic {
                decls.push("font-style: italic".to_string());
            }
            if style.underline {
                decls.push("text-decoration: underline".to_string());
            }
            if style.role == StyleRole::LineNumber {
                decls.push("opacity: 0.6".to_string());
                decls.push("user-select: none".to_string());
            }
            css.push_str(&format!(".{} {{ {} }}\n", class_name(idx), decls.join("; ")));
        }
        css
    }
}

fn class_name(idx: usize) -> String {
    format!("s{}", idx)
}

/// Fallback color for runs that carry no explicit foreground.
fn role_color(role: StyleRole) -> Option<Rgb> {
    match role {
        StyleRole::Error => Some(Rgb::new(0xd0, 0x30, 0x30)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_style_same_class() {
        let mut map = StyleMap::new();
        let a = TextStyle::role(StyleRole::Key).bold();
        let b = TextStyle::role(StyleRole::Value);
        assert_eq!(map.get_or_insert(a), "s0");
        assert_eq!(map.get_or_insert(b), "s1");
        assert_eq!(map.get_or_insert(a), "s0");
        assert_eq!(map.entries().len(), 2);
    }

    #[test]
    fn test_stylesheet_rules() {
        let mut map = StyleMap::new();
        map.get_or_insert(TextStyle::role(StyleRole::Key).with_foreground(Rgb::new(255, 0, 0)).bold());
        map.get_or_insert(TextStyle::role(StyleRole::Error));
        let css = map.stylesheet();
        assert!(css.contains(".s0 { color: #ff0000; font-weight: bold }"));
        assert!(css.contains(".s1 { color: #d03030 }"));
    }
}
