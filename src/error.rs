use crate::domain::export::slice_file::ExportError;
use crate::domain::image_set::ImageSetError;
use crate::domain::pattern::UnknownPatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラーが発生しました")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    UnknownPattern(#[from] UnknownPatternError),

    #[error(transparent)]
    ImageSet(#[from] ImageSetError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
