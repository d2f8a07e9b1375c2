use std::path::PathBuf;
use thiserror::Error;

/// 入力ディレクトリの検証・走査で発生するエラー。
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("パス '{0}' は存在しません。")]
    NotFound(PathBuf),

    #[error("パス '{0}' はディレクトリではありません。")]
    NotADirectory(PathBuf),

    #[error("ディレクトリ '{path}' の読み取りに失敗しました")]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
