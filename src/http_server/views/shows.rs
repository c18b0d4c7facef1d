use axum::response::Html;

use super::{delete_button, escape, layout, select_field, text_field, when};
use crate::entities;
use crate::forms::{FormErrors, ShowForm};
use crate::http_server::flash::FlashMessage;
use crate::services::show::ShowListing;

pub fn list(flashes: &[FlashMessage], shows: &[ShowListing]) -> Html<String> {
    let rows: String = shows
        .iter()
        .map(|show| {
            let image = show
                .artist_image_link
                .as_deref()
                .map(|link| {
                    format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape(link),
                        escape(&show.artist_name)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"<li class="show-card">
    {image}
    {time}
    <a href="/artists/{artist_id}">{artist}</a> playing at
    <a href="/venues/{venue_id}">{venue}</a>
    {delete}
</li>"#,
                time = when(&show.start_time),
                artist_id = show.artist_id,
                artist = escape(&show.artist_name),
                venue_id = show.venue_id,
                venue = escape(&show.venue_name),
                delete = delete_button(&format!("/shows/{}/delete", show.id), "Cancel"),
            )
        })
        .collect();

    let body = format!(
        r#"<h1>Shows</h1>
<ul class="shows">{rows}</ul>"#
    );
    layout("Shows", flashes, &body)
}

pub fn form(
    flashes: &[FlashMessage],
    form: &ShowForm,
    errors: &FormErrors,
    venues: &[entities::venue::Model],
    artists: &[entities::artist::Model],
) -> Html<String> {
    let artist_options: Vec<(String, String)> = artists
        .iter()
        .map(|a| (a.id.to_string(), a.name.clone()))
        .collect();
    let venue_options: Vec<(String, String)> = venues
        .iter()
        .map(|v| (v.id.to_string(), v.name.clone()))
        .collect();

    let body = format!(
        r#"<form class="form" method="post" action="/shows/create">
    <h2>List a new show</h2>
    {artist}
    {venue}
    {start_time}
    <button type="submit">Create show</button>
</form>"#,
        artist = select_field(
            "Artist",
            "artist_id",
            &artist_options,
            &form.artist_id.iter().cloned().collect::<Vec<_>>(),
            false,
            errors.get("artist_id"),
        ),
        venue = select_field(
            "Venue",
            "venue_id",
            &venue_options,
            &form.venue_id.iter().cloned().collect::<Vec<_>>(),
            false,
            errors.get("venue_id"),
        ),
        start_time = text_field(
            "Start time",
            "start_time",
            "datetime-local",
            form.start_time.as_deref(),
            errors.get("start_time"),
        ),
    );
    layout("New Show", flashes, &body)
}
