// src/scraper/page.rs

use super::utils::trim_url;
use regex::Regex;
use std::sync::LazyLock;

/// 详情页中的直链模式，按优先级排列
static DIRECT_AUDIO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"https://cdn\.pixabay\.com/audio/\d{4}/[^"'\\<>\s})]+\.(?:mp3|wav|ogg)"#,
        r#"https://cdn\.pixabay\.com/download/audio[^"'\\<>\s})]+\.(?:mp3|wav|ogg)"#,
        r#"https://cdn\.freesound\.org/previews/[^"'\\<>\s})]+\.(?:mp3|wav|ogg)"#,
        r#"https://freesound\.org/data/previews/[^"'\\<>\s})]+\.(?:mp3|wav|ogg)"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// 返回第一个有匹配的模式的首个匹配
pub fn extract_direct_audio_url(html: &str) -> Option<String> {
    DIRECT_AUDIO_PATTERNS
        .iter()
        .find_map(|re| re.find(html))
        .map(|m| trim_url(m.as_str()).to_string())
}
