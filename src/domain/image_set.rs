// use宣言：必要なクレートやモジュールをスコープに取り込む

use crate::domain::input_source::directory_path::DirectoryPath;
use crate::domain::input_source::path_error::DirectoryError;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 入力として扱う画像ファイルの拡張子（小文字）。
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

// --- トレイト定義 ---

/// 合成に使う画像の列。コンポジタはこのトレイト越しに 1 枚ずつ画像を受け取ります。
pub trait SliceSource {
    /// 基準となる (幅, 高さ)。キャンバスはこの大きさで作られます。
    fn dimensions(&self) -> (u32, u32);

    /// スライス数（= 合成に使う画像の枚数）。
    fn slice_count(&self) -> usize;

    /// `index` 番目の画像を RGB8 で返します。
    ///
    /// 大きさが `dimensions()` と異なる画像は `DimensionMismatch` として返します。
    fn load(&self, index: usize) -> Result<RgbImage, ImageSetError>;
}

// --- 構造体定義 ---

/// タイムラプス画像が入ったディレクトリから選ばれた、合成対象の画像ファイル列。
///
/// `open` コンストラクタを通じてのみインスタンス化でき、その際に以下の点が保証されます。
/// - 対応する拡張子のファイルが 1 つ以上あること
/// - 先頭のファイルから基準の幅と高さが読み取れていること
///
/// 画像のデコードは `load` が呼ばれるまで行いません。
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSet {
    source_dir: PathBuf,
    files: Vec<PathBuf>,
    total_images: usize,
    image_width: u32,
    image_height: u32,
}

// --- エラー定義 ---

/// `ImageSet` の構築や画像の読み込みで発生するエラー。
#[derive(Debug, Error)]
pub enum ImageSetError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("ディレクトリ '{0}' に画像ファイルが見つかりませんでした")]
    NoImagesFound(PathBuf),

    #[error("画像 '{path}' のデコードに失敗しました")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "画像 '{name}' のサイズ {}x{} が基準サイズ {}x{} と一致しません",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        name: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("インデックス {index} の画像はありません (全 {len} 枚)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("合成する画像が 1 枚もありません")]
    Empty,
}

// --- 実装ブロック ---

impl ImageSet {
    /// ディレクトリを走査して新しい `ImageSet` を作成します。
    ///
    /// # 引数
    /// * `dir`: 入力画像のディレクトリ。
    /// * `requested_count`: 使用する枚数。`0` または画像の総数以上なら全画像を使います。
    ///
    /// # 戻り値
    /// * `Ok(ImageSet)`: 画像が 1 枚以上見つかった場合。
    /// * `Err(ImageSetError)`: ディレクトリが不正、画像がない、先頭画像が読めない場合。
    pub fn open(dir: impl AsRef<Path>, requested_count: usize) -> Result<Self, ImageSetError> {
        let dir = DirectoryPath::new(dir)?;

        // 拡張子で絞り込む（デコードはまだ行わない）
        let all_files: Vec<PathBuf> = dir
            .files()?
            .into_iter()
            .filter(|path| is_image_file(path))
            .collect();
        if all_files.is_empty() {
            return Err(ImageSetError::NoImagesFound(dir.as_path().to_path_buf()));
        }
        let total_images = all_files.len();

        // 基準サイズは先頭の画像のヘッダから取得する
        let reference = &all_files[0];
        let (image_width, image_height) =
            image::image_dimensions(reference).map_err(|source| ImageSetError::ImageDecode {
                path: reference.clone(),
                source,
            })?;

        let files: Vec<PathBuf> = select_indices(total_images, requested_count)
            .into_iter()
            .map(|i| all_files[i].clone())
            .collect();

        info!(
            dir = %dir,
            total_images,
            selected = files.len(),
            width = image_width,
            height = image_height,
            "image set opened"
        );

        Ok(Self {
            source_dir: dir.path,
            files,
            total_images,
            image_width,
            image_height,
        })
    }

    // --- 便利メソッド ---

    /// 合成に使う画像の枚数を返します。
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// (幅, 高さ) をまとめて取得。
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    // --- ゲッターメソッド ---

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
    /// 間引く前の、ディレクトリ内の画像の総数。
    pub fn total_images(&self) -> usize {
        self.total_images
    }
    pub fn image_width(&self) -> u32 {
        self.image_width
    }
    pub fn image_height(&self) -> u32 {
        self.image_height
    }
}

impl SliceSource for ImageSet {
    fn dimensions(&self) -> (u32, u32) {
        ImageSet::dimensions(self)
    }

    fn slice_count(&self) -> usize {
        self.len()
    }

    fn load(&self, index: usize) -> Result<RgbImage, ImageSetError> {
        let path = self
            .files
            .get(index)
            .ok_or(ImageSetError::IndexOutOfRange {
                index,
                len: self.files.len(),
            })?;
        debug!(index, path = %path.display(), "decoding source image");

        let image = image::open(path)
            .map_err(|source| ImageSetError::ImageDecode {
                path: path.clone(),
                source,
            })?
            .into_rgb8();

        let actual = image.dimensions();
        if actual != self.dimensions() {
            return Err(ImageSetError::DimensionMismatch {
                name: path.display().to_string(),
                expected: self.dimensions(),
                actual,
            });
        }
        Ok(image)
    }
}

// --- ヘルパー関数 ---

/// `total` 枚から `requested` 枚を等間隔に選ぶときのインデックス列。
///
/// `round(i·(total−1)/(requested−1))` で選ぶため、重複することもあります。
/// `requested` が `0` または `total` 以上なら全インデックスを返します。
pub fn select_indices(total: usize, requested: usize) -> Vec<usize> {
    if requested == 0 || requested >= total {
        return (0..total).collect();
    }
    if requested == 1 {
        return vec![0];
    }
    let span = (total - 1) as f64;
    let steps = (requested - 1) as f64;
    (0..requested)
        .map(|i| (i as f64 * span / steps).round() as usize)
        .collect()
}

/// パスがサポートされている画像ファイルであるか、拡張子で簡易的に判定します。
pub fn is_image_file(path: &Path) -> bool {
    // ドットファイル (`.png` など) は `extension` が `None` になるので対象外
    // 拡張子を小文字に変換して比較する
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

// --- テストモジュール ---
