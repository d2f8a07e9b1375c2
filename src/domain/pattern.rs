//! タイムスライス画像の分割パターン。

use image::Rgb;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// キャンバスを領域に分割する幾何パターン。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// 縦の帯。
    Vertical,
    /// 同心円のリング。
    Circle,
    /// 画像中心を頂点とする扇形。
    SectorCentre,
    /// 画像下端の中央を頂点とする扇形。
    SectorBottom,
    /// 入れ子の矩形フレーム。
    Rectangle,
    /// 左上隅から伸びる斜めの帯。
    Diagonal,
}

/// 列挙にないパターン名が指定された場合のエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不明なパターン '{name}' です。指定可能な値: {}", Pattern::NAMES.join(", "))]
pub struct UnknownPatternError {
    pub name: String,
}

impl Pattern {
    /// すべてのパターン（CLI のヘルプ表示順）。
    pub const ALL: [Pattern; 6] = [
        Pattern::Vertical,
        Pattern::Circle,
        Pattern::SectorCentre,
        Pattern::SectorBottom,
        Pattern::Rectangle,
        Pattern::Diagonal,
    ];

    pub const NAMES: [&'static str; 6] = [
        "vertical",
        "circle",
        "sectorcentre",
        "sectorbottom",
        "rectangle",
        "diagonal",
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Vertical => "vertical",
            Pattern::Circle => "circle",
            Pattern::SectorCentre => "sectorcentre",
            Pattern::SectorBottom => "sectorbottom",
            Pattern::Rectangle => "rectangle",
            Pattern::Diagonal => "diagonal",
        }
    }

    /// キャンバスの初期塗りつぶし色。
    ///
    /// 領域が重なりながら縮んでいくパターンは黒、扇形と斜めのパターンは白で始めます。
    pub fn background(self) -> Rgb<u8> {
        match self {
            Pattern::Vertical | Pattern::Circle | Pattern::Rectangle => Rgb([0, 0, 0]),
            Pattern::SectorCentre | Pattern::SectorBottom | Pattern::Diagonal => {
                Rgb([255, 255, 255])
            }
        }
    }
}

impl FromStr for Pattern {
    type Err = UnknownPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPatternError {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
