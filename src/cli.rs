use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use timeslice::domain::export::slice_file::OutputFormat;
use timeslice::domain::pattern::Pattern;

/// 連続写真（タイムラプス）の画像を 1 枚のタイムスライス画像に合成するツール
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 合成する画像が入ったフォルダのパス
    #[arg(required = true)]
    pub input_dir: PathBuf,

    /// スライスのパターン (vertical, circle, sectorcentre, sectorbottom, rectangle, diagonal)
    #[arg(short, long, default_value = "vertical", value_parser = parse_pattern)]
    pub pattern: Pattern,

    /// 出力先フォルダのパス (オプション: デフォルトはカレントディレクトリ)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 使用する画像の枚数 (0 の場合はすべての画像を使用)
    #[arg(short, long, default_value_t = 0)]
    pub number_slices: usize,

    /// rectangle パターンで中央の矩形を大きくする
    #[arg(long)]
    pub big_centre: bool,

    /// 出力画像のフォーマット
    #[arg(short, long, value_enum, default_value_t = FormatArg::Jpeg)]
    pub format: FormatArg,

    /// JPEG の品質 (1-100)
    #[arg(short, long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// ログを詳しく表示する (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

fn parse_pattern(value: &str) -> Result<Pattern, String> {
    value.parse::<Pattern>().map_err(|e| e.to_string())
}
