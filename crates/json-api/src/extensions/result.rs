//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{error, warn};

/// Map errors to logged HTTP errors.
pub(crate) trait ResultExt<T> {
    /// Hide the error behind a 500.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Reject the request with a 400 carrying `brief`.
    fn or_400(self, brief: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            warn!("{brief}: {error}");

            StatusError::bad_request().brief(brief)
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_map_to_their_status() {
        let failed: Result<(), &str> = Err("pool timed out");

        assert_eq!(
            failed.or_500("rotation status").map_err(|e| e.code),
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(
            failed.or_400("unreadable body").map_err(|e| e.code),
            Err(StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn success_passes_through() {
        let ok: Result<u8, &str> = Ok(7);

        assert_eq!(ok.or_500("unused").ok(), Some(7));
    }
}
