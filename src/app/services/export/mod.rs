//! Output encoders for [`StyledText`].

pub mod ansi;
pub mod html;
pub mod style_map;

use crate::app::domain::settings::OutputFormat;
use crate::app::domain::styled::StyledText;

pub use html::PageSetup;

pub fn encode(text: &StyledText, format: OutputFormat, page: &PageSetup) -> String {
    match format {
        OutputFormat::Ansi => ansi::to_ansi(text),
        OutputFormat::Html => html::to_html_page(text, page),
        OutputFormat::Plain => text.plain_text(),
    }
}
