// src/transcoder.rs

use crate::{
    config::AppConfig,
    constants,
    error::*,
    ui, utils,
};
use indicatif::HumanBytes;
use log::{debug, error, warn};
use std::{
    ffi::OsString,
    fmt, fs, io,
    path::Path,
    process::Stdio,
};
use tokio::process::Command;

/// 目标格式。前三种有固定的编码参数，其余扩展名交给 ffmpeg 按容器自行处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFormat {
    /// AAC 128k 单声道，M4A 容器
    M4a,
    /// 16 位 PCM，44.1kHz 单声道，CAF 容器
    Caf,
    /// 16 位 PCM，44.1kHz 单声道，WAV 容器
    Wav,
    Other(String),
}

impl MediaFormat {
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.trim().trim_start_matches('.').to_lowercase();
        match hint.as_str() {
            "m4a" => MediaFormat::M4a,
            "caf" => MediaFormat::Caf,
            "wav" => MediaFormat::Wav,
            _ => MediaFormat::Other(hint),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_hint(&utils::path_extension(path))
    }

    pub fn extension(&self) -> &str {
        match self {
            MediaFormat::M4a => "m4a",
            MediaFormat::Caf => "caf",
            MediaFormat::Wav => "wav",
            MediaFormat::Other(ext) => ext,
        }
    }

    pub fn codec_args(&self) -> &'static [&'static str] {
        match self {
            MediaFormat::M4a => &["-c:a", "aac", "-b:a", "128k", "-ac", "1"],
            MediaFormat::Caf => &["-c:a", "pcm_s16le", "-ar", "44100", "-ac", "1", "-f", "caf"],
            MediaFormat::Wav => &["-c:a", "pcm_s16le", "-ar", "44100", "-ac", "1"],
            MediaFormat::Other(_) => &[],
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeOutcome {
    Converted,
    /// ffmpeg 不可用，原样复制 (内容与扩展名可能不符)
    Copied,
    /// 源格式与目标一致，未转码
    Unchanged,
}

pub struct Transcoder {
    program: String,
}

impl Transcoder {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            program: config.ffmpeg_program.clone(),
        }
    }

    pub fn command_args(input: &Path, output: &Path, format: &MediaFormat) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
        args.extend(format.codec_args().iter().map(OsString::from));
        args.push(output.into());
        args
    }

    pub async fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: &MediaFormat,
    ) -> AppResult<TranscodeOutcome> {
        let args = Self::command_args(input, output, format);
        debug!("执行转码: {} {:?}", self.program, args);
        eprintln!(
            "  Converting -> {}: {}",
            format,
            output.file_name().unwrap_or_default().to_string_lossy()
        );

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("未找到转码工具 '{}'，将直接复制文件: {:?}", self.program, output);
                ui::warn(&format!(
                    "{} not found, copying without conversion (install with: sudo apt install ffmpeg)",
                    self.program
                ));
                fs::copy(input, output)?;
                return Ok(TranscodeOutcome::Copied);
            }
            Err(e) => return Err(e.into()),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let tail = utils::tail_chars(&stderr, constants::FFMPEG_STDERR_TAIL);
            error!("转码失败 ({}): {}", out.status, tail);
            return Err(AppError::Transcode(tail.to_string()));
        }

        let size = fs::metadata(output)?.len();
        eprintln!("  Converted: {} ({})", output.display(), HumanBytes(size));
        Ok(TranscodeOutcome::Converted)
    }
}
