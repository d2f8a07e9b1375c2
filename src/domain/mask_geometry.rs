//! パターンごとのマスク形状の計算。
//!
//! すべての関数は (スライス番号, スライス数, 幅, 高さ) だけから形状を決める純粋関数です。
//! 呼び出し間で状態を持たないため、どの順番で呼んでも同じ結果になります。

use crate::domain::pattern::Pattern;
use kurbo::{Circle, Point, Rect};
use std::f64::consts::FRAC_PI_2;

/// 扇形の弧を折れ線で近似するときの、頂点間の最大角度（度）。
pub const MAX_ARC_STEP_DEG: f64 = 30.0;

/// 弧上の頂点を置く距離（対角線長 `D` に対する倍率）。
///
/// 30° ごとの折れ線でも辺と頂点の距離は `2D·cos 15° > D` なので、
/// 頂点がどこにあってもキャンバス全体が扇形の和に含まれる。
pub const ARC_REACH: f64 = 2.0;

/// 扇形の三角関数の中間値を丸める小数点以下の桁数。
pub const SECTOR_ROUNDING_DECIMALS: i32 = 5;

/// マスクの基になる図形。座標はキャンバスのピクセル座標（左上が原点）。
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Polygon(Vec<Point>),
}

/// 図形の内側と外側のどちらを不透明にするか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Inside,
    Outside,
}

/// 1 枚のスライスに対応するマスク定義。
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub shape: Shape,
    pub coverage: Coverage,
}

impl Region {
    fn inside(shape: Shape) -> Self {
        Self {
            shape,
            coverage: Coverage::Inside,
        }
    }

    fn outside(shape: Shape) -> Self {
        Self {
            shape,
            coverage: Coverage::Outside,
        }
    }
}

/// rectangle パターンの中心部の大きさ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectangleCentre {
    /// フレームの幅が均等になる。
    #[default]
    Normal,
    /// 縮小量を 3/4 に抑え、中央に大きな矩形を残す。
    Big,
}

impl RectangleCentre {
    pub fn scale(self) -> f64 {
        match self {
            RectangleCentre::Normal => 1.0,
            RectangleCentre::Big => 0.75,
        }
    }
}

/// パターンから各スライスの領域を求めるディスパッチャ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskGeometry {
    pattern: Pattern,
    rectangle_centre: RectangleCentre,
}

impl MaskGeometry {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            rectangle_centre: RectangleCentre::default(),
        }
    }

    pub fn with_rectangle_centre(mut self, centre: RectangleCentre) -> Self {
        self.rectangle_centre = centre;
        self
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn rectangle_centre(&self) -> RectangleCentre {
        self.rectangle_centre
    }

    /// `count` 枚中 `index` 番目のスライスの領域を返します。
    ///
    /// `count >= 1` かつ `index < count` であることが前提です。
    pub fn region(&self, index: usize, count: usize, width: u32, height: u32) -> Region {
        debug_assert!(count > 0 && index < count, "slice {index} of {count}");
        let (w, h) = (f64::from(width), f64::from(height));
        match self.pattern {
            Pattern::Vertical => vertical(index, count, w, h),
            Pattern::Circle => circle(index, count, w, h),
            Pattern::SectorCentre => sector_centre(index, count, w, h),
            Pattern::SectorBottom => sector_bottom(index, count, w, h),
            Pattern::Rectangle => rectangle(index, count, w, h, self.rectangle_centre),
            Pattern::Diagonal => diagonal(index, count, w, h),
        }
    }
}

/// 左端が `i·W/n` で右端まで伸びる矩形。後のスライスほど右側だけを上書きする。
pub fn vertical(i: usize, n: usize, w: f64, h: f64) -> Region {
    let left = i as f64 * (w / n as f64);
    Region::inside(Shape::Rect(Rect::new(left, 0.0, w, h)))
}

/// 中心から対角の半分を半径とし、スライスごとに `R0/n` ずつ小さくなる円。
pub fn circle(i: usize, n: usize, w: f64, h: f64) -> Region {
    let centre = Point::new(w / 2.0, h / 2.0);
    let full_radius = (w / 2.0).hypot(h / 2.0);
    let radius = full_radius - i as f64 * (full_radius / n as f64);
    Region::inside(Shape::Circle(Circle::new(centre, radius)))
}

/// 画像中心を頂点に、角度 `i·Δ` から `(i+1)·Δ` までを覆う扇形（`Δ = 360°/n`）。
pub fn sector_centre(i: usize, n: usize, w: f64, h: f64) -> Region {
    sector_region(Pattern::SectorCentre, Point::new(w / 2.0, h / 2.0), i, n, w, h)
}

/// 下端中央を頂点に、270° から左→右へ `Δ = 180°/n` ずつ進む扇形。
pub fn sector_bottom(i: usize, n: usize, w: f64, h: f64) -> Region {
    sector_region(Pattern::SectorBottom, Point::new(w / 2.0, h), i, n, w, h)
}

fn sector_region(pattern: Pattern, apex: Point, i: usize, n: usize, w: f64, h: f64) -> Region {
    let points = match (sector_angles(pattern, i, n), sector_sweep_deg(pattern, n)) {
        (Some((start, end)), Some(sweep_deg)) => {
            let segments = (sweep_deg / MAX_ARC_STEP_DEG).ceil().max(1.0) as usize;
            sector_polygon(apex, ARC_REACH * w.hypot(h), start, end, segments)
        }
        _ => Vec::new(),
    };
    Region::inside(Shape::Polygon(points))
}

/// 全体から上下左右に `(W·s/n/2, H·s/n/2)` ずつ縮んでいく入れ子の矩形。
pub fn rectangle(i: usize, n: usize, w: f64, h: f64, centre: RectangleCentre) -> Region {
    let s = centre.scale();
    let dx = i as f64 * (w * s / n as f64 / 2.0);
    let dy = i as f64 * (h * s / n as f64 / 2.0);
    Region::inside(Shape::Rect(Rect::new(dx, dy, w - dx, h - dy)))
}

/// 左上隅の直角三角形を除いた残り全体。
///
/// 三角形の斜辺は画像の対角線と直交する向きで、スライスごとに `D/n` ずつ外側へ進む。
pub fn diagonal(i: usize, n: usize, w: f64, h: f64) -> Region {
    let diagonal_length = w.hypot(h);
    let theta = (h / diagonal_length).acos();
    let offset = i as f64 * (diagonal_length / n as f64);
    let x_end = offset / theta.sin();
    let y_end = offset / (FRAC_PI_2 - theta).sin();
    Region::outside(Shape::Polygon(vec![
        Point::ORIGIN,
        Point::new(x_end, 0.0),
        Point::new(0.0, y_end),
    ]))
}

/// 扇形スライスの (開始角, 終了角) をラジアンで返します。扇形以外のパターンでは `None`。
///
/// sectorcentre は 0 から角度が増える方向、sectorbottom は 270° から減る方向に進みます。
/// 1 枚あたりの角度は 5 桁に丸めた値で、多角形の頂点もこの角度から作られます。
pub fn sector_angles(pattern: Pattern, i: usize, n: usize) -> Option<(f64, f64)> {
    let sweep = round_sector(sector_sweep_deg(pattern, n)?.to_radians());
    let (origin, step) = match pattern {
        Pattern::SectorCentre => (0.0, sweep),
        _ => (270f64.to_radians(), -sweep),
    };
    Some((origin + step * i as f64, origin + step * (i + 1) as f64))
}

/// 扇形 1 枚あたりの角度（度、丸め前）。
fn sector_sweep_deg(pattern: Pattern, n: usize) -> Option<f64> {
    match pattern {
        Pattern::SectorCentre => Some(360.0 / n as f64),
        Pattern::SectorBottom => Some(180.0 / n as f64),
        _ => None,
    }
}

/// 小数点以下 5 桁への丸め（偶数丸め）。
///
/// 隣り合う扇形の辺が同じ値から計算されるよう、三角関数の結果は必ずこれを通す。
pub fn round_sector(value: f64) -> f64 {
    let factor = 10f64.powi(SECTOR_ROUNDING_DECIMALS);
    (value * factor).round_ties_even() / factor
}

fn arc_point(apex: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        apex.x + radius * round_sector(angle.sin()),
        apex.y + radius * round_sector(angle.cos()),
    )
}

/// `start` から `end` までの扇形を、弧を `segments` 分割した多角形で返します。
///
/// `segments == 1` なら三角形そのもの。広い扇形に頂点を補うのは、
/// 180°・360° の扇形が線分に潰れないようにするため。
/// 両端の頂点は `start`・`end` そのものから作るので、隣の扇形と共有する辺は一致する。
fn sector_polygon(apex: Point, reach: f64, start: f64, end: f64, segments: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(segments + 2);
    points.push(apex);
    for k in 0..=segments {
        let angle = if k == segments {
            end
        } else {
            start + (end - start) * k as f64 / segments as f64
        };
        points.push(arc_point(apex, reach, angle));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    const W: f64 = 120.0;
    const H: f64 = 80.0;

    fn polygon(region: &Region) -> Vec<Point> {
        match &region.shape {
            Shape::Polygon(points) => points.clone(),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    fn rect(region: &Region) -> Rect {
        match region.shape {
            Shape::Rect(r) => r,
            ref other => panic!("expected rect, got {:?}", other),
        }
    }

    fn circle_of(region: &Region) -> Circle {
        match region.shape {
            Shape::Circle(c) => c,
            ref other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn single_slice_rectangles_cover_the_canvas() {
        let full = Rect::new(0.0, 0.0, W, H);
        assert_eq!(rect(&vertical(0, 1, W, H)), full);
        assert_eq!(rect(&rectangle(0, 1, W, H, RectangleCentre::Normal)), full);
        assert_eq!(rect(&rectangle(0, 1, W, H, RectangleCentre::Big)), full);
    }

    #[test]
    fn single_slice_circle_reaches_every_corner() {
        let c = circle_of(&circle(0, 1, W, H));
        for corner in [
            Point::new(0.0, 0.0),
            Point::new(W, 0.0),
            Point::new(0.0, H),
            Point::new(W, H),
        ] {
            assert!(c.center.distance(corner) <= c.radius + 1e-9);
        }
    }

    #[test]
    fn single_slice_diagonal_excludes_nothing() {
        let region = diagonal(0, 1, W, H);
        assert_eq!(region.coverage, Coverage::Outside);
        assert!(polygon(&region).iter().all(|p| *p == Point::ORIGIN));
    }

    #[test]
    fn single_slice_sectors_close_the_arc() {
        let points = polygon(&sector_centre(0, 1, W, H));
        // 頂点 + 12 区間分の弧上の点
        assert_eq!(points.len(), 14);
        let first = points[1];
        let last = points[points.len() - 1];
        assert!(first.distance(last) < 1e-6);

        let bottom = polygon(&sector_bottom(0, 1, W, H));
        assert_eq!(bottom.len(), 8);
        let reach = ARC_REACH * W.hypot(H);
        assert_eq!(bottom[0], Point::new(W / 2.0, H));
        assert!(bottom[1].distance(Point::new(W / 2.0 - reach, H)) < 1e-9);
        assert!(bottom[bottom.len() - 1].distance(Point::new(W / 2.0 + reach, H)) < 1e-9);
    }

    #[test]
    fn vertical_left_edges_are_evenly_spaced() {
        for i in 0..4 {
            let r = rect(&vertical(i, 4, 100.0, 50.0));
            assert_eq!(r.x0, 25.0 * i as f64);
            assert_eq!(r.x1, 100.0);
            assert_eq!(r.y0, 0.0);
            assert_eq!(r.y1, 50.0);
        }
    }

    #[test]
    fn circle_rings_meet_without_gaps() {
        for n in [2usize, 3, 7, 16] {
            for i in 1..n {
                let outer = circle_of(&circle(i, n, W, H)).radius;
                let previous_inner = circle_of(&circle(i - 1, n, W, H)).radius
                    - (W / 2.0).hypot(H / 2.0) / n as f64;
                assert!((outer - previous_inner).abs() < 1e-4, "n={n} i={i}");
            }
            let last = circle_of(&circle(n - 1, n, W, H)).radius;
            assert!(last > 0.0);
        }
    }

    #[test]
    fn circles_share_the_canvas_centre() {
        for i in 0..5 {
            assert_eq!(circle_of(&circle(i, 5, W, H)).center, Point::new(60.0, 40.0));
        }
    }

    // 頂点から見た点の向き（x = sin θ, y = cos θ の規約）
    fn angle_around(apex: Point, p: Point) -> f64 {
        (p.x - apex.x).atan2(p.y - apex.y)
    }

    fn same_direction(a: f64, b: f64) -> bool {
        let diff = (a - b).rem_euclid(TAU);
        diff.min(TAU - diff) < 1e-4
    }

    #[test]
    fn sector_sweeps_sum_to_full_turn_and_half_turn() {
        for n in [1usize, 2, 3, 7, 12, 25] {
            let sweep = |pattern| -> f64 {
                (0..n)
                    .map(|i| {
                        let (a, b) = sector_angles(pattern, i, n).unwrap();
                        (b - a).abs()
                    })
                    .sum()
            };
            // 1 枚あたりの角度は 5 桁に丸めてあるので、誤差は最大 n·0.5e-5
            let tolerance = n as f64 * 0.5e-5 + 1e-12;
            let centre = sweep(Pattern::SectorCentre);
            let bottom = sweep(Pattern::SectorBottom);
            assert!((centre - TAU).abs() <= tolerance, "n={n}: {centre}");
            assert!((bottom - PI).abs() <= tolerance, "n={n}: {bottom}");
        }
    }

    #[test]
    fn sector_polygons_follow_sector_angles() {
        let centre_apex = Point::new(W / 2.0, H / 2.0);
        let bottom_apex = Point::new(W / 2.0, H);
        for n in [1usize, 2, 3, 5, 12, 25] {
            for i in 0..n {
                for (pattern, apex, region) in [
                    (Pattern::SectorCentre, centre_apex, sector_centre(i, n, W, H)),
                    (Pattern::SectorBottom, bottom_apex, sector_bottom(i, n, W, H)),
                ] {
                    let points = polygon(&region);
                    let (start, end) = sector_angles(pattern, i, n).unwrap();
                    let first = angle_around(apex, points[1]);
                    let last = angle_around(apex, points[points.len() - 1]);
                    assert!(same_direction(first, start), "{pattern} n={n} i={i} start");
                    assert!(same_direction(last, end), "{pattern} n={n} i={i} end");
                }
            }
        }
    }

    #[test]
    fn sector_angles_are_contiguous() {
        for n in [2usize, 6, 7] {
            for pattern in [Pattern::SectorCentre, Pattern::SectorBottom] {
                for i in 1..n {
                    let (_, prev_end) = sector_angles(pattern, i - 1, n).unwrap();
                    let (start, _) = sector_angles(pattern, i, n).unwrap();
                    assert_eq!(prev_end, start, "{pattern} n={n} i={i}");
                }
            }
        }
        assert_eq!(sector_angles(Pattern::SectorCentre, 0, 6).unwrap().0, 0.0);
        assert_eq!(
            sector_angles(Pattern::SectorBottom, 0, 6).unwrap().0,
            270f64.to_radians()
        );
        assert!(sector_angles(Pattern::Vertical, 0, 6).is_none());
    }

    fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
        let ab = b - a;
        if ab.hypot2() == 0.0 {
            return p.distance(a);
        }
        let t = ((p - a).dot(ab) / ab.hypot2()).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }

    #[test]
    fn arc_edges_stay_outside_the_canvas() {
        // 細長いキャンバスでも、弧の折れ線の各辺は頂点から D より遠い
        for (w, h) in [(11.0, 50.0), (3.0, 200.0), (W, H)] {
            let d = f64::hypot(w, h);
            for n in [1usize, 2, 7] {
                for i in 0..n {
                    for region in [sector_centre(i, n, w, h), sector_bottom(i, n, w, h)] {
                        let points = polygon(&region);
                        let apex = points[0];
                        for edge in points[1..].windows(2) {
                            let nearest = distance_to_segment(apex, edge[0], edge[1]);
                            assert!(nearest > d, "{w}x{h} n={n} i={i}: {nearest} <= {d}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn narrow_sectors_are_triangles() {
        assert_eq!(polygon(&sector_centre(3, 12, W, H)).len(), 3);
        assert_eq!(polygon(&sector_bottom(2, 6, W, H)).len(), 3);
        assert_eq!(polygon(&sector_centre(0, 3, W, H)).len(), 6);
    }

    #[test]
    fn adjacent_sectors_share_an_edge_vertex() {
        for n in [3usize, 5, 24] {
            for i in 1..n {
                let prev = polygon(&sector_centre(i - 1, n, W, H)).to_vec();
                let next = polygon(&sector_centre(i, n, W, H)).to_vec();
                assert_eq!(prev[prev.len() - 1], next[1], "centre n={n} i={i}");

                let prev = polygon(&sector_bottom(i - 1, n, W, H)).to_vec();
                let next = polygon(&sector_bottom(i, n, W, H)).to_vec();
                assert_eq!(prev[prev.len() - 1], next[1], "bottom n={n} i={i}");
            }
        }
    }

    #[test]
    fn sector_trig_values_are_rounded_to_five_decimals() {
        let d = ARC_REACH * W.hypot(H);
        let apex = Point::new(W / 2.0, H / 2.0);
        for p in &polygon(&sector_centre(1, 7, W, H))[1..] {
            for component in [(p.x - apex.x) / d, (p.y - apex.y) / d] {
                let scaled = component * 1e5;
                assert!((scaled - scaled.round()).abs() < 1e-6, "{component}");
            }
        }
    }

    #[test]
    fn round_sector_uses_ties_to_even() {
        assert_eq!(round_sector(0.123456), 0.12346);
        assert_eq!(round_sector(-1.0), -1.0);
        assert_eq!(round_sector(90f64.to_radians()), 1.5708);
        assert_eq!(round_sector(2.5e-6), 0.0);
    }

    #[test]
    fn first_sector_starts_straight_down_from_centre() {
        let d = ARC_REACH * W.hypot(H);
        let points = polygon(&sector_centre(0, 12, W, H));
        assert_eq!(points[0], Point::new(60.0, 40.0));
        assert_eq!(points[1], Point::new(60.0, 40.0 + d));
    }

    #[test]
    fn rectangle_frames_shrink_symmetrically() {
        let r = rect(&rectangle(1, 4, 100.0, 80.0, RectangleCentre::Normal));
        assert_eq!(r, Rect::new(12.5, 10.0, 87.5, 70.0));

        let big = rect(&rectangle(1, 4, 100.0, 80.0, RectangleCentre::Big));
        assert_eq!(big, Rect::new(9.375, 7.5, 90.625, 72.5));

        let innermost = rect(&rectangle(3, 4, 100.0, 80.0, RectangleCentre::Big));
        let normal = rect(&rectangle(3, 4, 100.0, 80.0, RectangleCentre::Normal));
        assert!(innermost.area() > normal.area());
    }

    #[test]
    fn diagonal_wedge_legs_grow_with_offset() {
        let (w, h) = (30.0, 40.0);
        // D = 50, θ = acos(40/50): sin θ = 0.6, sin(π/2 − θ) = 0.8
        let points = polygon(&diagonal(2, 5, w, h)).to_vec();
        assert_eq!(points[0], Point::ORIGIN);
        assert!((points[1].x - 20.0 / 0.6).abs() < 1e-9);
        assert_eq!(points[1].y, 0.0);
        assert_eq!(points[2].x, 0.0);
        assert!((points[2].y - 20.0 / 0.8).abs() < 1e-9);
    }

    #[test]
    fn last_diagonal_wedge_leaves_the_far_corner() {
        let (w, h) = (30.0, 40.0);
        let points = polygon(&diagonal(4, 5, w, h)).to_vec();
        let (a, b) = (points[1].x, points[2].y);
        assert!(w / a + h / b > 1.0);
    }

    #[test]
    fn regions_are_reproducible() {
        for pattern in Pattern::ALL {
            let geometry = MaskGeometry::new(pattern).with_rectangle_centre(RectangleCentre::Big);
            for i in 0..5 {
                assert_eq!(
                    geometry.region(i, 5, 640, 480),
                    geometry.region(i, 5, 640, 480),
                    "{pattern}"
                );
            }
        }
    }

    #[test]
    fn dispatch_matches_pattern_functions() {
        let geometry = MaskGeometry::new(Pattern::SectorBottom);
        assert_eq!(geometry.region(2, 5, 120, 80), sector_bottom(2, 5, W, H));
        let geometry = MaskGeometry::new(Pattern::Rectangle);
        assert_eq!(
            geometry.region(2, 5, 120, 80),
            rectangle(2, 5, W, H, RectangleCentre::Normal)
        );
        assert_eq!(geometry.rectangle_centre(), RectangleCentre::Normal);
        assert_eq!(geometry.pattern(), Pattern::Rectangle);
    }
}
