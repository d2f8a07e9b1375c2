use super::path_error::DirectoryError;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// 構造体としてDirectoryPathを定義
#[derive(Debug)]
pub struct DirectoryPath {
    pub path: PathBuf,
}

impl DirectoryPath {
    // コンストラクタ: パスを受け取り、バリデーションを行う
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let path = path.as_ref();

        // パスが存在し、かつディレクトリであることを検証
        if !path.exists() {
            return Err(DirectoryError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(DirectoryError::NotADirectory(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    // 内部のPathBufへの参照を返す
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// ディレクトリ直下の通常ファイルを、ファイル名順に並べて返します。
    ///
    /// サブディレクトリは再帰的に辿りません。
    /// 読み取り順序はファイルシステムに依存するため、ソートして順序を安定させます。
    pub fn files(&self) -> Result<Vec<PathBuf>, DirectoryError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| DirectoryError::Io {
                path: self.path.clone(),
                source,
            })?;
            // シンボリックリンクはリンク先で判定する（リンク切れは対象外）
            if entry.path().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

// Displayトレイトの実装（表示用）
impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
