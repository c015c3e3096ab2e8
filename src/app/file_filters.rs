use std::path::Path;

/// Bytes inspected when sniffing for binary content.
const SNIFF_LEN: usize = 8000;

/// How a file is previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Structured YAML outline
    Yaml,
    /// Syntax-highlighted source
    Source,
}

const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Well-known YAML files without a YAML extension.
const YAML_FILE_NAMES: &[&str] = &[".clang-format", ".clang-tidy", ".gemrc"];

pub fn is_yaml_file(path: &Path) -> bool {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.iter().any(|y| ext.eq_ignore_ascii_case(y)));
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| YAML_FILE_NAMES.contains(&name));
    by_ext || by_name
}

pub fn classify(path: &Path) -> FileKind {
    if is_yaml_file(path) {
        FileKind::Yaml
    } else {
        FileKind::Source
    }
}

/// NUL bytes near the start mean binary content, unless the data starts with
/// a UTF-16 byte order mark.
pub fn is_likely_binary(bytes: &[u8]) -> bool {
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return false;
    }
    bytes.iter().take(SNIFF_LEN).any(|&b| b == 0)
}
