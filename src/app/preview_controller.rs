use std::path::Path;

use crate::app::domain::settings::{AppSettings, OutputFormat};
use crate::app::domain::styled::{StyleRole, StyledText, TextStyle};
use crate::app::domain::theme::{Appearance, CodedThemeName};
use crate::app::file_filters::{FileKind, classify, is_likely_binary};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::file_reader::read_capped;
use crate::app::services::export::{self, PageSetup};
use crate::app::services::syntax::{
    HighlightOptions, SourceHighlighter, ThemeCatalog, ThemeColors, theme_colors,
};
use crate::app::services::text_ops::{decode_text, extract_filename, normalize_line_endings};
use crate::app::services::yaml::{StyleContext, YamlRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Full preview of the file
    Preview,
    /// First lines only, without line numbers
    Thumbnail,
}

/// A rendered file, ready to be encoded.
#[derive(Debug, Clone)]
pub struct Preview {
    pub text: StyledText,
    pub page: PageSetup,
    /// Syntax used, or "YAML outline" for the structured renderer
    pub syntax_name: String,
    /// Input was cut at the byte limit
    pub truncated: bool,
}

pub struct PreviewController {
    settings: AppSettings,
    appearance: Appearance,
    catalog: ThemeCatalog,
    highlighter: SourceHighlighter,
    /// Syntax name that replaces detection
    forced_syntax: Option<String>,
}

impl PreviewController {
    /// Build a controller with the bundled themes plus any user themes.
    pub fn new(settings: AppSettings, appearance: Appearance) -> Self {
        let mut catalog = ThemeCatalog::load_defaults();
        let dir = ThemeCatalog::custom_theme_dir();
        match catalog.load_custom_dir(&dir) {
            Ok(0) => {}
            Ok(n) => log::info!("Loaded {} custom theme(s) from {}", n, dir.display()),
            Err(e) => log::warn!("Could not read custom themes in {}: {}", dir.display(), e),
        }
        Self::with_catalog(settings, appearance, catalog)
    }

    pub fn with_catalog(settings: AppSettings, appearance: Appearance, catalog: ThemeCatalog) -> Self {
        Self {
            settings,
            appearance,
            catalog,
            highlighter: SourceHighlighter::new(),
            forced_syntax: None,
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn theme_name(&self) -> &CodedThemeName {
        self.settings.theme_for(self.appearance)
    }

    /// Use `name` for this run. The appearance switches to the one the theme
    /// is coded for. Unknown names are rejected.
    pub fn use_theme(&mut self, name: CodedThemeName) -> Result<()> {
        self.catalog.get(&name)?;
        self.appearance = name.appearance();
        match self.appearance {
            Appearance::Light => self.settings.light_theme = name,
            Appearance::Dark => self.settings.dark_theme = name,
        }
        Ok(())
    }

    /// Highlight every file as `name` (syntax name or file extension).
    /// Also disables the YAML outline.
    pub fn force_syntax(&mut self, name: &str) -> Result<()> {
        let syntax = self
            .highlighter
            .find_by_name(name)
            .ok_or_else(|| AppError::Syntax(format!("unknown syntax '{}'", name)))?;
        self.forced_syntax = Some(syntax.name.clone());
        Ok(())
    }

    fn colors(&self) -> ThemeColors {
        let theme = self.catalog.get_or_default(self.theme_name(), self.appearance);
        theme_colors(theme)
    }

    fn page_setup(&self, path: &Path, colors: &ThemeColors) -> PageSetup {
        PageSetup {
            title: extract_filename(path),
            background: colors.background,
            foreground: colors.foreground,
            font_family: self.settings.font_family.clone(),
            font_size: self.settings.font_size,
            word_wrap: self.settings.word_wrap_enabled,
        }
    }

    /// Read, decode and render a file.
    pub fn render_file(&self, path: &Path, kind: PreviewKind) -> Result<Preview> {
        let read = read_capped(path, self.settings.max_preview_bytes)?;
        if is_likely_binary(&read.bytes) {
            return Err(AppError::Decode(format!(
                "{} looks like binary data",
                path.display()
            )));
        }
        let truncated = read.truncated();
        if truncated {
            log::info!(
                "{} truncated to {} of {} bytes",
                path.display(),
                read.bytes.len(),
                read.total_len
            );
        }
        let text = decode_text(&read.bytes, truncated)?;
        let mut preview = self.render_text(path, &text, kind, truncated);
        if truncated && kind == PreviewKind::Preview {
            preview.text.push(
                format!(
                    "\n… preview truncated at {} of {} bytes\n",
                    read.bytes.len(),
                    read.total_len
                ),
                TextStyle::role(StyleRole::Placeholder).italic(),
            );
        }
        Ok(preview)
    }

    /// Render already decoded text. `path` only drives type detection and
    /// the page title.
    pub fn render_text(&self, path: &Path, text: &str, kind: PreviewKind, truncated: bool) -> Preview {
        let text = normalize_line_endings(text);
        let colors = self.colors();
        let page = self.page_setup(path, &colors);

        // A cut YAML file would only produce a parse error
        let use_yaml = self.settings.yaml_enabled
            && self.forced_syntax.is_none()
            && classify(path) == FileKind::Yaml
            && !truncated;

        let (mut styled, syntax_name) = if use_yaml {
            (self.render_yaml(&text, &colors), "YAML outline".to_string())
        } else {
            self.render_source(path, &text, &colors, kind)
        };

        if kind == PreviewKind::Thumbnail {
            styled.truncate_lines(self.settings.thumbnail_lines);
        }

        Preview {
            text: styled,
            page,
            syntax_name,
            truncated,
        }
    }

    fn render_yaml(&self, text: &str, colors: &ThemeColors) -> StyledText {
        let context = StyleContext::new(
            self.settings.yaml_indent_step,
            self.settings.key_color_override().unwrap_or(colors.key),
            self.settings.value_color_override().unwrap_or(colors.value),
        );
        YamlRenderer::new(context, self.settings.yaml_show_source_on_error).render_documents(text)
    }

    fn render_source(
        &self,
        path: &Path,
        text: &str,
        colors: &ThemeColors,
        kind: PreviewKind,
    ) -> (StyledText, String) {
        let syntax = self
            .forced_syntax
            .as_deref()
            .and_then(|name| self.highlighter.find_by_name(name))
            .unwrap_or_else(|| self.highlighter.detect_syntax(path, text));
        log::debug!("Highlighting {} as {}", path.display(), syntax.name);
        let theme = self.catalog.get_or_default(self.theme_name(), self.appearance);
        let options = HighlightOptions {
            tab_size: self.settings.tab_size as usize,
            line_numbers: self.settings.line_numbers_enabled && kind == PreviewKind::Preview,
            gutter: colors.gutter,
        };
        // Thumbnails only need the first lines; skip highlighting the rest
        let source = match kind {
            PreviewKind::Thumbnail => first_lines(text, self.settings.thumbnail_lines),
            PreviewKind::Preview => text,
        };
        let styled = self.highlighter.highlight(source, syntax, theme, &options);
        (styled, syntax.name.clone())
    }

    pub fn encode(&self, preview: &Preview, format: OutputFormat) -> String {
        export::encode(&preview.text, format, &preview.page)
    }
}

fn first_lines(text: &str, max_lines: usize) -> &str {
    match text.match_indices('\n').nth(max_lines.saturating_sub(1)) {
        Some((idx, _)) if max_lines > 0 => &text[..=idx],
        Some(_) => "",
        None => text,
    }
}
