// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to persist temporary file: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not parse response from '{url}': {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("image API returned {status}: {message}")]
    ImageApi { status: u16, message: String },
    #[error("no OpenAI API key found; place it in {key_file} or set ${env_var}")]
    MissingCredential { key_file: String, env_var: String },
    #[error("ffmpeg conversion failed:\n{0}")]
    Transcode(String),
    #[error("no results found for '{query}' on {site}. TIP: try a different query, source, or provide a direct --url")]
    NoResults { query: String, site: String },
    #[error(
        "could not extract an audio URL from page {page_url}. TIP: visit the page in a browser, copy the download URL, then use: asset-fetcher audio --url <URL> --output {output}"
    )]
    PageUnresolved { page_url: String, output: String },
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    InvalidManifestEntry(String),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
