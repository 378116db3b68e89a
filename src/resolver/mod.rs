// src/resolver/mod.rs

pub mod audio;
pub mod image;

pub use audio::AudioResolver;
pub use image::ImageResolver;

use crate::error::AppResult;
use log::debug;
use std::{fs, io, path::Path};
use tempfile::NamedTempFile;

/// 临时文件需要 "直接落地" 时使用; 跨文件系统无法重命名时退回复制，
/// 临时文件随后在 drop 时删除。
pub(crate) fn move_into_place(tmp: NamedTempFile, output: &Path) -> AppResult<()> {
    match tmp.persist(output) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::CrossesDevices => {
            debug!("临时文件与 {:?} 不在同一文件系统，改为复制", output);
            fs::copy(e.file.path(), output)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn ensure_parent_dir(output: &Path) -> AppResult<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
