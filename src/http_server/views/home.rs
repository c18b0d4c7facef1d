use axum::response::Html;

use super::{layout, search_box};
use crate::http_server::flash::FlashMessage;

pub fn page(flashes: &[FlashMessage]) -> Html<String> {
    let body = format!(
        r#"<section class="home">
    <h1>Gigboard</h1>
    <p>Find venues and artists, and book the next show.</p>
    <div class="home-search">
        <h2>Venues</h2>
        {venue_search}
        <a class="button" href="/venues/create">List a venue</a>
    </div>
    <div class="home-search">
        <h2>Artists</h2>
        {artist_search}
        <a class="button" href="/artists/create">List an artist</a>
    </div>
    <p><a class="button" href="/shows/create">Post a show</a></p>
</section>"#,
        venue_search = search_box("/venues/search", "Find a venue", ""),
        artist_search = search_box("/artists/search", "Find an artist", ""),
    );
    layout("Home", flashes, &body)
}
