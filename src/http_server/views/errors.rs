use axum::response::Html;

use super::layout;

pub fn not_found() -> Html<String> {
    layout(
        "Not Found",
        &[],
        r#"<section class="error-page">
    <h1>404</h1>
    <p>Sorry, the page you were looking for could not be found.</p>
    <p><a href="/">Back to the home page</a></p>
</section>"#,
    )
}

pub fn server_error() -> Html<String> {
    layout(
        "Server Error",
        &[],
        r#"<section class="error-page">
    <h1>500</h1>
    <p>Something went wrong on our end. Please try again later.</p>
    <p><a href="/">Back to the home page</a></p>
</section>"#,
    )
}
