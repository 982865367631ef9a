use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown attribute {0:?}")]
    UnknownAttribute(String),

    #[error("attribute {0:?} requires a value")]
    MissingValue(String),
}
