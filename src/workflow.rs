//! アプリケーションのメインワークフローを定義するモジュール。
//!
//! このモジュールは、UI層（`cli`）とドメイン層（`domain`）を仲介し、
//! 画像の読み込みから合成・保存までの処理フローを実装します。

use crate::cli::Args;
use std::path::PathBuf;
use timeslice::domain::export::slice_file::{OutputFormat, SliceFile};
use timeslice::domain::image_set::ImageSet;
use timeslice::domain::mask_geometry::RectangleCentre;
use timeslice::domain::slice_engine::SliceEngine;
use timeslice::error::AppError;

/// アプリケーションのメインロジックを実行し、書き出したファイルのパスを返します。
///
/// # 戻り値
/// * `Ok(PathBuf)`: 合成画像を保存できた場合。
/// * `Err(AppError)`: 入力の検証・合成・保存のどこかで失敗した場合。
///   途中で失敗した場合、出力ファイルは作られません。
pub fn run(args: Args) -> Result<PathBuf, AppError> {
    // 1. 出力ディレクトリの決定
    // 指定されていなければカレントディレクトリに書き出す。
    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    // 2. 入力画像の列挙と間引き
    let images = ImageSet::open(&args.input_dir, args.number_slices)?;
    println!(
        "[読み込み] {} の {} 枚中 {} 枚を使用します。",
        images.source_dir().display(),
        images.total_images(),
        images.len()
    );

    // 3. 合成
    let centre = if args.big_centre {
        RectangleCentre::Big
    } else {
        RectangleCentre::Normal
    };
    let composed = SliceEngine::new(args.pattern)
        .with_rectangle_centre(centre)
        .compose(&images)?;

    // 4. 保存
    let path = SliceFile::new(&composed, OutputFormat::from(args.format))
        .with_quality(args.quality)
        .save_to_dir(&output_dir)?;
    println!("  -> 完了: タイムスライス画像を {} に書き出しました。", path.display());

    Ok(path)
}
