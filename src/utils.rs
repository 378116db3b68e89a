// src/utils.rs

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;
use url::Url;

/// 查询参数中保持原样的字符 (字母数字以及 `_.-~`)
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// 按表单规则编码查询词: 空格变为 `+`，其余保留字符做百分号编码
pub fn encode_query(query: &str) -> String {
    query
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// 取 URL 路径部分的扩展名 (小写，不含点)
pub fn url_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    Path::new(parsed.path())
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// 取 URL 路径中的文件名主干，如 `.../rain-loop.mp3` -> `rain-loop`
pub fn url_file_stem(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            Path::new(parsed.path())
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// 取路径扩展名 (小写，不含点)
pub fn path_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

/// 保留字符串末尾最多 `max_chars` 个字符
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    let start = text.char_indices().nth(skip).map(|(i, _)| i).unwrap_or(0);
    &text[start..]
}
