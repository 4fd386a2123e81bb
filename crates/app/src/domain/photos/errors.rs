//! Photos repository errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotosRepositoryError {
    #[error("stored photo data is invalid")]
    InvalidData(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PhotosRepositoryError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::ColumnDecode { .. } | Error::Decode(_)) {
            return Self::InvalidData(error);
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData(error),
            Some(_) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failures_are_invalid_data() {
        let error = Error::ColumnDecode {
            index: "license_type".to_string(),
            source: "unknown variant".into(),
        };

        assert!(matches!(
            PhotosRepositoryError::from(error),
            PhotosRepositoryError::InvalidData(_)
        ));
    }

    #[test]
    fn pool_failures_are_storage_errors() {
        assert!(matches!(
            PhotosRepositoryError::from(Error::PoolTimedOut),
            PhotosRepositoryError::Sql(_)
        ));
    }
}
