use std::path::PathBuf;
use thiserror::Error;

pub type XlsheetResult<T> = Result<T, XlsheetError>;

#[derive(Error, Debug)]
pub enum XlsheetError {
    #[error("The data parameter can't be empty with the operation 'write'.")]
    MissingData,

    #[error("The data parameter must be a JSON list of objects: {0}")]
    InvalidData(#[from] serde_json::Error),

    #[error("Only the xlsx format is supported, '{0}' was refused.")]
    UnsupportedFormat(String),

    #[error("The path {} doesn't exist and the parameter 'create' is false.", .0.display())]
    PathMissing(PathBuf),

    #[error("The file {} doesn't exist and the parameter 'create' is false.", .0.display())]
    FileMissing(PathBuf),

    #[error("A table named '{0}' already exists in the workbook.")]
    DuplicateTableName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load Excel file: {0}")]
    Load(String),

    #[error("Excel write error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}
