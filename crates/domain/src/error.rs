use crate::NameError;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("Routine must contain at least one exercise")]
    NoEntries,
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("submission already in progress")]
    InProgress,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for SubmitError {
    fn from(value: ReadError) -> Self {
        match value {
            // The only read in the submission path is the session lookup.
            ReadError::NotFound => SubmitError::Storage(StorageError::NoSession),
            ReadError::Storage(storage) => SubmitError::Storage(storage),
            ReadError::Other(other) => SubmitError::Other(other),
        }
    }
}

impl From<CreateError> for SubmitError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Storage(storage) => SubmitError::Storage(storage),
            CreateError::Other(other) => SubmitError::Other(other),
        }
    }
}
