use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;

use crate::http_server::{flash, views};

pub async fn index(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, views::home::page(&flashes))
}
