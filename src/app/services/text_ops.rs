use std::path::Path;

use crate::app::infrastructure::error::{AppError, Result};

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Decode raw file bytes into text.
///
/// Understands a UTF-8 BOM and UTF-16 (LE/BE) with BOM; everything else must
/// be valid UTF-8. When `truncated` is set the bytes were cut at an arbitrary
/// offset, so an incomplete trailing sequence is dropped instead of failing.
pub fn decode_text(bytes: &[u8], truncated: bool) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return decode_utf8(rest, truncated);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, truncated, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, truncated, u16::from_be_bytes);
    }
    decode_utf8(bytes, truncated)
}

fn decode_utf8(bytes: &[u8], truncated: bool) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        // error_len() == None means the input ended mid-sequence
        Err(e) if truncated && e.error_len().is_none() => {
            Ok(String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned())
        }
        Err(e) => Err(AppError::Decode(format!(
            "invalid UTF-8 at byte {}",
            e.valid_up_to()
        ))),
    }
}

fn decode_utf16(bytes: &[u8], truncated: bool, to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let usable = if bytes.len() % 2 == 1 {
        if !truncated {
            return Err(AppError::Decode("odd byte count in UTF-16 text".to_string()));
        }
        bytes.len() - 1
    } else {
        bytes.len()
    };
    let mut units: Vec<u16> = bytes[..usable]
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    // A cut may leave a dangling high surrogate at the end
    if truncated && units.last().is_some_and(|u| (0xD800..0xDC00).contains(u)) {
        units.pop();
    }
    char::decode_utf16(units.iter().copied())
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| AppError::Decode(format!("invalid UTF-16: {}", e)))
}

/// Convert CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Replace tabs with spaces up to the next tab stop.
pub fn expand_tabs(line: &str, tab_size: usize, start_column: usize) -> (String, usize) {
    let tab_size = tab_size.max(1);
    let mut column = start_column;
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\t' => {
                let pad = tab_size - (column % tab_size);
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    (out, column)
}

/// Digits needed to print the largest line number.
pub fn line_number_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}
