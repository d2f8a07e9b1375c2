// --- 依存モジュール ---

// 合成済みの画像とそのラベルは slice_engine モジュールの ComposedSlice が持っています。
use crate::domain::slice_engine::ComposedSlice;

// image クレートのエンコーダで JPEG / PNG に書き出します。
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ImageError;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// JPEG の既定の品質。
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// 出力画像のフォーマット。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// ファイル名に付ける拡張子。
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// 画像の保存時に発生する可能性のあるエラー。
/// どちらも書き込もうとしたパスを保持しているので、呼び出し元はそのまま報告できます。
#[derive(Debug, Error)]
pub enum ExportError {
    /// 出力ディレクトリを作成できなかった場合。
    #[error("出力ディレクトリ '{path}' を作成できませんでした")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// ファイルの作成・エンコード・書き込みに失敗した場合（権限不足、ディスク容量不足など）。
    #[error("画像 '{path}' を書き込めませんでした")]
    Write {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// 合成済みのタイムスライス画像を、ファイルとして書き出すための構造体。
///
/// 画像は借用するだけなので、保存に失敗しても `ComposedSlice` は手元に残り、
/// 別の出力先で再試行できます。
#[derive(Debug, Clone, Copy)]
pub struct SliceFile<'a> {
    composed: &'a ComposedSlice,
    format: OutputFormat,
    quality: u8,
}

impl<'a> SliceFile<'a> {
    pub fn new(composed: &'a ComposedSlice, format: OutputFormat) -> Self {
        Self {
            composed,
            format,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// JPEG の品質（1〜100）を設定します。範囲外の値は丸め込みます。PNG では無視されます。
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// `timeslice_<pattern>_<count>_images.<ext>` 形式のファイル名。
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.composed.label(), self.format.extension())
    }

    /// `dir` の下にファイルを保存し、そのパスを返します。
    ///
    /// `dir` が存在しない場合は作成します。
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        // 出力ディレクトリが存在しない場合は作成する。
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let path = dir.join(self.file_name());
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// 指定されたパスに画像をエンコードして書き込みます。
    pub fn save_to_path(&self, path: &Path) -> Result<(), ExportError> {
        let write_error = |source: ImageError| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(|e| write_error(ImageError::IoError(e)))?;
        let mut writer = BufWriter::new(file);
        let image = self.composed.image();
        match self.format {
            OutputFormat::Jpeg => {
                image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, self.quality))
            }
            OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut writer)),
        }
        .map_err(write_error)?;
        // BufWriter はドロップ時のエラーを握りつぶすため、明示的に flush する
        writer
            .flush()
            .map_err(|e| write_error(ImageError::IoError(e)))?;

        info!(path = %path.display(), format = ?self.format, "time slice written");
        Ok(())
    }
}
