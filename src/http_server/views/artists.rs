use axum::response::Html;

use super::{
    choices, delete_button, escape, genre_tags, layout, search_box, select_field, show_sections,
    text_field, textarea_field, yes_no_choices,
};
use crate::forms::{ArtistForm, FormErrors, GENRE_CHOICES, STATE_CHOICES};
use crate::http_server::flash::FlashMessage;
use crate::services::SearchResults;
use crate::services::artist::{ArtistDetail, ArtistSummary};

fn artist_items(artists: &[ArtistSummary]) -> String {
    artists
        .iter()
        .map(|artist| {
            format!(
                r#"<li><a href="/artists/{}">{}</a></li>"#,
                artist.id,
                escape(&artist.name)
            )
        })
        .collect()
}

pub fn list(flashes: &[FlashMessage], artists: &[ArtistSummary]) -> Html<String> {
    let body = format!(
        r#"{search}
<h1>Artists</h1>
<ul class="items">{items}</ul>"#,
        search = search_box("/artists/search", "Find an artist", ""),
        items = artist_items(artists),
    );
    layout("Artists", flashes, &body)
}

pub fn search_results(
    flashes: &[FlashMessage],
    term: &str,
    results: &SearchResults<ArtistSummary>,
) -> Html<String> {
    let items: String = results
        .data
        .iter()
        .map(|artist| {
            format!(
                r#"<li><a href="/artists/{id}">{name}</a> <span class="upcoming">{count} upcoming</span></li>"#,
                id = artist.id,
                name = escape(&artist.name),
                count = artist.num_upcoming_shows,
            )
        })
        .collect();

    let body = format!(
        r#"{search}
<h3>Number of search results for "{term}": {count}</h3>
<ul class="items">{items}</ul>"#,
        search = search_box("/artists/search", "Find an artist", term),
        term = escape(term),
        count = results.count,
    );
    layout("Artist Search", flashes, &body)
}

pub fn detail(flashes: &[FlashMessage], detail: &ArtistDetail) -> Html<String> {
    let artist = &detail.artist;

    let phone = artist
        .phone
        .as_deref()
        .map(|phone| format!("<p><strong>Phone:</strong> {}</p>", escape(phone)))
        .unwrap_or_default();
    let links: String = [
        ("Website", artist.website.as_deref()),
        ("Facebook", artist.facebook_link.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.map(|url| {
            format!(
                r#"<p><a href="{}" target="_blank" rel="noopener">{label}</a></p>"#,
                escape(url)
            )
        })
    })
    .collect();
    let seeking = if artist.seeking_venue {
        format!(
            r#"<div class="seeking"><p>Currently seeking performance venues</p><p>{}</p></div>"#,
            escape(artist.seeking_description.as_deref().unwrap_or_default())
        )
    } else {
        r#"<p class="not-seeking">Not currently seeking performance venues</p>"#.to_string()
    };
    let image = artist
        .image_link
        .as_deref()
        .map(|link| {
            format!(
                r#"<img class="hero" src="{}" alt="{}">"#,
                escape(link),
                escape(&artist.name)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<article class="detail">
    <h1>{name}</h1>
    <p class="subtitle">ID: {id}</p>
    <div class="genres">{genres}</div>
    <p>{city}, {state}</p>
    {phone}
    {links}
    {seeking}
    {image}
    <div class="actions">
        <a class="button" href="/artists/{id}/edit">Edit</a>
        {delete}
    </div>
</article>
{shows}"#,
        name = escape(&artist.name),
        id = artist.id,
        genres = genre_tags(&detail.genres),
        city = escape(&artist.city),
        state = escape(&artist.state),
        delete = delete_button(&format!("/artists/{}/delete", artist.id), "Delete artist"),
        shows = show_sections(&detail.shows, "/venues"),
    );
    layout(&artist.name, flashes, &body)
}

pub fn form(
    flashes: &[FlashMessage],
    heading: &str,
    action: &str,
    form: &ArtistForm,
    errors: &FormErrors,
) -> Html<String> {
    let state: Vec<String> = form.state.iter().cloned().collect();
    let seeking_venue: Vec<String> = form.seeking_venue.iter().cloned().collect();

    let fields = [
        text_field("Name", "name", "text", form.name.as_deref(), errors.get("name")),
        text_field("City", "city", "text", form.city.as_deref(), errors.get("city")),
        select_field("State", "state", &choices(STATE_CHOICES), &state, false, errors.get("state")),
        text_field("Phone", "phone", "tel", form.phone.as_deref(), errors.get("phone")),
        select_field(
            "Genres",
            "genres",
            &choices(GENRE_CHOICES),
            &form.genres,
            true,
            errors.get("genres"),
        ),
        text_field(
            "Image link",
            "image_link",
            "url",
            form.image_link.as_deref(),
            errors.get("image_link"),
        ),
        text_field(
            "Website",
            "website",
            "url",
            form.website.as_deref(),
            errors.get("website"),
        ),
        text_field(
            "Facebook link",
            "facebook_link",
            "url",
            form.facebook_link.as_deref(),
            errors.get("facebook_link"),
        ),
        select_field(
            "Seeking venue",
            "seeking_venue",
            &yes_no_choices(),
            &seeking_venue,
            false,
            errors.get("seeking_venue"),
        ),
        textarea_field(
            "Seeking description",
            "seeking_description",
            form.seeking_description.as_deref(),
            errors.get("seeking_description"),
        ),
    ]
    .join("\n    ");

    let body = format!(
        r#"<form class="form" method="post" action="{action}">
    <h2>{heading}</h2>
    {fields}
    <button type="submit">{heading}</button>
</form>"#,
        heading = escape(heading),
    );
    layout(heading, flashes, &body)
}
