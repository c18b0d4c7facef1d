use axum::http::Uri;

use crate::http_server::error::HttpError;

pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::not_found(uri.path())
}
