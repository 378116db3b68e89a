// src/constants.rs

pub const UI_WIDTH: usize = 60;
pub const URL_PREVIEW_LENGTH: usize = 100;
pub const PROMPT_PREVIEW_LENGTH: usize = 100;
pub const FFMPEG_STDERR_TAIL: usize = 500;
pub const SEARCH_PREVIEW_COUNT: usize = 5;
pub const LIST_PREVIEW_COUNT: usize = 10;

pub const CONFIG_DIR_NAME: &str = concat!(".", env!("CARGO_PKG_NAME"));
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(env!("CARGO_PKG_NAME"), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const API_KEY_FILE_NAME: &str = "openai_api_key";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const RESULTS_EXTENSION: &str = "results.json";

pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_SOURCE_EXTENSION: &str = "mp3";
pub const NATIVE_IMAGE_EXTENSION: &str = "png";
pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const ACCEPT_ANY: &str = "*/*";
pub const ACCEPT_HTML: &str = "text/html";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

pub mod image_api {
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    pub const GENERATIONS_PATH: &str = "/images/generations";
    pub const DEFAULT_MODEL: &str = "dall-e-3";
    pub const RESPONSE_FORMAT_URL: &str = "url";
}

pub mod sources {
    pub const PIXABAY_NAME: &str = "Pixabay";
    pub const PIXABAY_LICENSE: &str = "Pixabay License - royalty-free, no attribution, commercial OK";
    pub const PIXABAY_LABEL: &str = "Pixabay License";
    pub const PIXABAY_TAG: &str = "pixabay";
    pub const PIXABAY_SEARCH_URL: &str = "https://pixabay.com/sound-effects/search/{query}/";
    pub const PIXABAY_PAGE_URL: &str = "https://pixabay.com/sound-effects/{slug}/";

    pub const FREESOUND_NAME: &str = "Freesound CC0";
    pub const FREESOUND_LICENSE: &str = "CC0 Public Domain - no restrictions";
    pub const FREESOUND_LABEL: &str = "CC0";
    pub const FREESOUND_TAG: &str = "freesound-cc0";
    pub const FREESOUND_SEARCH_URL: &str = "https://freesound.org/search/?q={query}&f=license:%22Creative+Commons+0%22&s=rating+desc";
}

pub const HELP_AFTER: &str = r#"Audio sources (all license-safe for commercial apps):
  pixabay   - Pixabay License: royalty-free, no attribution, commercial OK
  freesound - CC0 Public Domain: no restrictions whatsoever
  all       - search both, pixabay results first

Audio formats:
  m4a  - AAC compressed, good for ambient loops (small files)
  caf  - PCM 16-bit uncompressed, good for one-shot SFX (low latency)
  wav  - PCM 16-bit uncompressed, universal compatibility"#;
