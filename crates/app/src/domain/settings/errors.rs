//! Settings repository errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsRepositoryError {
    #[error("featured photo does not exist")]
    UnknownPhoto,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SettingsRepositoryError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownPhoto,
            Some(_) | None => Self::Sql(error),
        }
    }
}
