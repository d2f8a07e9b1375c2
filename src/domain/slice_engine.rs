//! パターンの解決から合成までを束ねるオーケストレータ。

use crate::domain::compositor::Compositor;
use crate::domain::image_set::{ImageSet, ImageSetError, SliceSource};
use crate::domain::mask_geometry::{MaskGeometry, RectangleCentre};
use crate::domain::pattern::{Pattern, UnknownPatternError};
use crate::error::AppError;
use image::RgbImage;
use std::path::Path;
use tracing::info;

/// 合成の結果。画像と、どのパターン・何枚で作られたかを保持します。
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSlice {
    image: RgbImage,
    pattern: Pattern,
    count: usize,
}

impl ComposedSlice {
    /// 出力ファイル名などに使うラベル（例: `timeslice_vertical_4_images`）。
    pub fn label(&self) -> String {
        format!("timeslice_{}_{}_images", self.pattern, self.count)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SliceEngine {
    geometry: MaskGeometry,
}

impl SliceEngine {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            geometry: MaskGeometry::new(pattern),
        }
    }

    /// パターン名から作成します。列挙にない名前はここで弾かれます。
    pub fn from_name(name: &str) -> Result<Self, UnknownPatternError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn with_rectangle_centre(mut self, centre: RectangleCentre) -> Self {
        self.geometry = self.geometry.with_rectangle_centre(centre);
        self
    }

    pub fn pattern(&self) -> Pattern {
        self.geometry.pattern()
    }

    /// `source` の画像をパターンに沿って 1 枚の画像に合成します。
    #[tracing::instrument(skip_all, fields(pattern = %self.pattern(), slices = source.slice_count()))]
    pub fn compose<S>(&self, source: &S) -> Result<ComposedSlice, ImageSetError>
    where
        S: SliceSource + ?Sized,
    {
        let image = Compositor::new(self.geometry).composite(source)?;
        info!(
            width = image.width(),
            height = image.height(),
            "time slice composed"
        );
        Ok(ComposedSlice {
            image,
            pattern: self.pattern(),
            count: source.slice_count(),
        })
    }

    /// ディレクトリの画像からタイムスライス画像を作ります。
    ///
    /// パターン名の検証はファイルに触れる前に行います。
    /// `count` が `0` なら全画像を使います。
    #[tracing::instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn run(
        dir: impl AsRef<Path>,
        pattern_name: &str,
        count: usize,
    ) -> Result<ComposedSlice, AppError> {
        let engine = Self::from_name(pattern_name)?;
        let images = ImageSet::open(dir, count)?;
        Ok(engine.compose(&images)?)
    }
}
