use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};

use crate::http_server::views;

/// Error returned by page handlers.
///
/// Anything convertible into a `color_eyre::Report` becomes an internal error,
/// so handlers can use `?` on service calls.
pub enum HttpError {
    NotFound(String),
    Internal(color_eyre::Report),
}

pub type HttpResult<T> = Result<T, HttpError>;

impl HttpError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl std::fmt::Debug for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::Internal(err) => std::fmt::Debug::fmt(err, f),
        }
    }
}

impl<E> From<E> for HttpError
where
    E: Into<color_eyre::Report>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response<Body> {
        match self {
            Self::NotFound(what) => {
                log::debug!("Not found: {what}");
                (StatusCode::NOT_FOUND, views::errors::not_found()).into_response()
            }
            Self::Internal(err) => {
                log::error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::errors::server_error(),
                )
                    .into_response()
            }
        }
    }
}
