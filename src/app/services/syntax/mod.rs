pub mod catalog;
mod highlighter;

use std::path::Path;
use std::sync::OnceLock;

use regex_lite::Regex;
use syntect::highlighting::Theme;
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub use catalog::{ThemeCatalog, ThemeColors, ThemeEntry, theme_colors};
pub use highlighter::HighlightOptions;

/// Emacs `-*- mode: x -*-` and vim `vim: set ft=x` / `vi: filetype=x` modelines.
fn modeline_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:-\*-.*?mode:\s*([\w+#-]+).*?-\*-|\bvim?:.*?\b(?:ft|filetype)=([\w+#-]+))")
            .expect("modeline pattern is valid")
    })
}

pub struct SourceHighlighter {
    syntax_set: SyntaxSet,
}

impl Default for SourceHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    pub fn plain_text(&self) -> &SyntaxReference {
        self.syntax_set.find_syntax_plain_text()
    }

    /// Detect the syntax for a file from its name, then its first line
    /// (shebang, XML prolog), then an editor modeline in the first or last
    /// few lines. Falls back to plain text.
    pub fn detect_syntax(&self, path: &Path, text: &str) -> &SyntaxReference {
        if let Some(syntax) = self.detect_by_name(path) {
            return syntax;
        }
        let first_line = text.lines().next().unwrap_or("");
        if let Some(syntax) = self.syntax_set.find_syntax_by_first_line(first_line) {
            return syntax;
        }
        if let Some(syntax) = self.detect_by_modeline(text) {
            return syntax;
        }
        self.plain_text()
    }

    fn detect_by_name(&self, path: &Path) -> Option<&SyntaxReference> {
        // Some syntaxes register whole file names (Makefile, Gemfile) as extensions
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && let Some(syntax) = self.syntax_set.find_syntax_by_extension(name)
        {
            return Some(syntax);
        }
        let ext = path.extension()?.to_str()?;
        self.syntax_set
            .find_syntax_by_extension(ext)
            .or_else(|| self.syntax_set.find_syntax_by_extension(&ext.to_ascii_lowercase()))
    }

    fn detect_by_modeline(&self, text: &str) -> Option<&SyntaxReference> {
        let lines: Vec<&str> = text.lines().collect();
        let head = lines.iter().take(5);
        let tail = lines.iter().rev().take(5);
        for line in head.chain(tail) {
            if let Some(caps) = modeline_pattern().captures(line) {
                let token = caps.get(1).or_else(|| caps.get(2))?.as_str();
                if let Some(syntax) = self.syntax_set.find_syntax_by_token(token) {
                    return Some(syntax);
                }
            }
        }
        None
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_name(name)
            .or_else(|| self.syntax_set.find_syntax_by_token(name))
    }

    pub fn highlight(
        &self,
        text: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
        options: &HighlightOptions,
    ) -> crate::app::domain::styled::StyledText {
        highlighter::highlight_full(text, syntax, &self.syntax_set, theme, options)
    }
}
