use crate::domain::image_set::{select_indices, ImageSetError, SliceSource};
use image::RgbImage;

// デコード済みの画像をメモリ上に保持する SliceSource
// 基準サイズは先頭の画像から決まる
#[derive(Debug, Clone)]
pub struct InMemoryImages {
    images: Vec<RgbImage>,
    image_width: u32,
    image_height: u32,
}

impl InMemoryImages {
    pub fn new(images: Vec<RgbImage>) -> Result<Self, ImageSetError> {
        let (image_width, image_height) = images
            .first()
            .map(|image| image.dimensions())
            .ok_or(ImageSetError::Empty)?;
        Ok(Self {
            images,
            image_width,
            image_height,
        })
    }

    /// `ImageSet::open` と同じ規則で `count` 枚に間引きます。
    pub fn resampled(self, count: usize) -> Self {
        let images = select_indices(self.images.len(), count)
            .into_iter()
            .map(|i| self.images[i].clone())
            .collect();
        Self { images, ..self }
    }

    pub fn images(&self) -> &[RgbImage] {
        &self.images
    }
}

impl SliceSource for InMemoryImages {
    fn dimensions(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    fn slice_count(&self) -> usize {
        self.images.len()
    }

    fn load(&self, index: usize) -> Result<RgbImage, ImageSetError> {
        let image = self
            .images
            .get(index)
            .ok_or(ImageSetError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })?;
        if image.dimensions() != self.dimensions() {
            return Err(ImageSetError::DimensionMismatch {
                name: format!("#{index}"),
                expected: self.dimensions(),
                actual: image.dimensions(),
            });
        }
        Ok(image.clone())
    }
}
