// src/resolver/image.rs

use super::ensure_parent_dir;
use crate::{
    FetchContext,
    cli::{ImageQuality, ImageSize},
    client::BrowserClient,
    config::AppConfig,
    constants::{self, image_api},
    error::*,
    models::{
        SavedAsset,
        api::{ApiErrorResponse, ImageGenerationRequest, ImageGenerationResponse},
    },
    symbols,
    transcoder::{MediaFormat, TranscodeOutcome, Transcoder},
    utils,
};
use anyhow::anyhow;
use indicatif::HumanBytes;
use log::{debug, error, info};
use std::{fs, path::Path, sync::Arc};

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Portrait => "1024x1792",
            ImageSize::Landscape => "1792x1024",
        }
    }
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Hd => "hd",
        }
    }
}

pub struct ImageResolver {
    http: reqwest::Client,
    client: Arc<BrowserClient>,
    transcoder: Arc<Transcoder>,
    config: Arc<AppConfig>,
    api_key: String,
}

impl ImageResolver {
    pub fn new(context: &FetchContext, api_key: String) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(context.config.api_timeout)
            .build()?;
        Ok(Self {
            http,
            client: context.client.clone(),
            transcoder: context.transcoder.clone(),
            config: context.config.clone(),
            api_key,
        })
    }

    /// 调用生成接口，只请求一张图片并返回其 URL。失败立即返回，不重试。
    async fn request_image_url(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: ImageQuality,
    ) -> AppResult<String> {
        let endpoint = format!(
            "{}{}",
            self.config.image_api_base.trim_end_matches('/'),
            image_api::GENERATIONS_PATH
        );
        let body = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt,
            size,
            quality,
            n: 1,
            response_format: image_api::RESPONSE_FORMAT_URL,
        };
        debug!("POST {} (model: {})", endpoint, self.config.image_model);

        let res = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| utils::truncate_text(&text, 200));
            error!("图片生成接口返回 {}: {}", status, message);
            return Err(AppError::ImageApi {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ImageGenerationResponse =
            serde_json::from_str(&text).map_err(|source| AppError::ApiParseFailed {
                url: endpoint.clone(),
                source,
            })?;
        let image = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("image API response contained no images"))?;

        if let Some(revised) = &image.revised_prompt {
            eprintln!("  Revised prompt: {}", utils::truncate_text(revised, 120));
        }
        image
            .url
            .ok_or_else(|| AppError::Other(anyhow!("image API response contained no URL")))
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        output: &Path,
        size: ImageSize,
        quality: ImageQuality,
    ) -> AppResult<SavedAsset> {
        ensure_parent_dir(output)?;
        info!("生成图片 -> {:?} (size: {}, quality: {})", output, size.as_str(), quality.as_str());
        eprintln!("Generating image with DALL-E 3...");
        eprintln!(
            "  Prompt: {}",
            utils::truncate_text(prompt, constants::PROMPT_PREVIEW_LENGTH)
        );
        eprintln!("  Size: {}, Quality: {}", size.as_str(), quality.as_str());

        let image_url = self.request_image_url(prompt, size, quality).await?;
        let data = self.client.fetch(&image_url, constants::ACCEPT_ANY).await?;

        let outcome = if utils::path_extension(output) == constants::NATIVE_IMAGE_EXTENSION {
            fs::write(output, &data)?;
            eprintln!(
                "  {} Saved: {} ({})",
                *symbols::OK,
                output.display(),
                HumanBytes(data.len() as u64)
            );
            TranscodeOutcome::Unchanged
        } else {
            // 临时 PNG 在离开作用域时删除
            let tmp = tempfile::Builder::new()
                .prefix("asset-fetcher-")
                .suffix(&format!(".{}", constants::NATIVE_IMAGE_EXTENSION))
                .tempfile()?;
            fs::write(tmp.path(), &data)?;
            self.transcoder
                .convert(tmp.path(), output, &MediaFormat::from_path(output))
                .await?
        };

        Ok(SavedAsset {
            path: output.to_path_buf(),
            outcome,
        })
    }
}
