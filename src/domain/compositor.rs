//! マスクのラスタライズと、キャンバスへの貼り付け。

use crate::domain::image_set::{ImageSetError, SliceSource};
use crate::domain::mask_geometry::{Coverage, MaskGeometry, Region, Shape};
use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect as PixelRect;
use tracing::debug;

/// マスクの不透明（貼り付ける）画素。
pub const OPAQUE: Luma<u8> = Luma([255]);
/// マスクの透明（キャンバスをそのまま残す）画素。
pub const TRANSPARENT: Luma<u8> = Luma([0]);

/// 領域を `width`×`height` の 1 チャンネルのマスクに描画します。
///
/// 図形の座標はピクセル格子に丸めて描画し、幅や高さが 0 に潰れた図形は何も描きません。
pub fn rasterize(region: &Region, width: u32, height: u32) -> GrayImage {
    let (fill, background) = match region.coverage {
        Coverage::Inside => (OPAQUE, TRANSPARENT),
        Coverage::Outside => (TRANSPARENT, OPAQUE),
    };
    let mut mask = GrayImage::from_pixel(width, height, background);
    draw_shape(&mut mask, &region.shape, fill);
    mask
}

fn draw_shape(mask: &mut GrayImage, shape: &Shape, color: Luma<u8>) {
    let (width, height) = mask.dimensions();
    match shape {
        Shape::Rect(rect) => {
            let x0 = snap(rect.x0, width);
            let x1 = snap(rect.x1, width);
            let y0 = snap(rect.y0, height);
            let y1 = snap(rect.y1, height);
            if x1 > x0 && y1 > y0 {
                let pixels = PixelRect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0);
                draw_filled_rect_mut(mask, pixels, color);
            }
        }
        Shape::Circle(circle) => {
            let radius = circle.radius.ceil();
            if radius > 0.0 {
                let centre = (circle.center.x.floor() as i32, circle.center.y.floor() as i32);
                draw_filled_circle_mut(mask, centre, radius as i32, color);
            }
        }
        Shape::Polygon(points) => {
            let mut pixels: Vec<PixelPoint<i32>> = points
                .iter()
                .map(|p| PixelPoint::new(p.x.round() as i32, p.y.round() as i32))
                .collect();
            pixels.dedup();
            // imageproc は始点と終点が同じ多角形を受け付けない
            while pixels.len() > 1 && pixels.first() == pixels.last() {
                pixels.pop();
            }
            if pixels.len() >= 3 {
                draw_polygon_mut(mask, &pixels, color);
            }
        }
    }
}

/// 連続座標をピクセル境界に丸め、`[0, limit]` に収めます。
fn snap(value: f64, limit: u32) -> u32 {
    value.round().clamp(0.0, f64::from(limit)) as u32
}

/// マスクが不透明な画素だけ `source` を `canvas` に写します。
///
/// 3 つの画像は同じ大きさであることが前提です。
pub fn paste_masked(canvas: &mut RgbImage, source: &RgbImage, mask: &GrayImage) {
    debug_assert_eq!(canvas.dimensions(), source.dimensions());
    debug_assert_eq!(canvas.dimensions(), mask.dimensions());
    for ((dst, src), m) in canvas.pixels_mut().zip(source.pixels()).zip(mask.pixels()) {
        if m.0[0] != 0 {
            *dst = *src;
        }
    }
}

/// スライスを順番にキャンバスへ重ねていく合成器。
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    geometry: MaskGeometry,
}

impl Compositor {
    pub fn new(geometry: MaskGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &MaskGeometry {
        &self.geometry
    }

    /// パターンの背景色で塗ったキャンバスに、全スライスを順に貼り付けて返します。
    ///
    /// 後のスライスほど上に重なります。画像は 1 枚ずつ読み込むので、
    /// 同時に保持するのはキャンバス・マスク・元画像 1 枚だけです。
    pub fn composite<S>(&self, source: &S) -> Result<RgbImage, ImageSetError>
    where
        S: SliceSource + ?Sized,
    {
        let (width, height) = source.dimensions();
        let count = source.slice_count();
        if count == 0 {
            return Err(ImageSetError::Empty);
        }

        let mut canvas = RgbImage::from_pixel(width, height, self.geometry.pattern().background());
        for index in 0..count {
            let region = self.geometry.region(index, count, width, height);
            let mask = rasterize(&region, width, height);
            // 大きさの検証は SliceSource::load の責務
            let image = source.load(index)?;
            paste_masked(&mut canvas, &image, &mask);
            debug!(index, count, pattern = %self.geometry.pattern(), "slice pasted");
        }
        Ok(canvas)
    }
}
