use axum::response::Html;

use super::{
    choices, delete_button, escape, genre_tags, layout, search_box, select_field, show_sections,
    text_field, textarea_field, yes_no_choices,
};
use crate::forms::{FormErrors, GENRE_CHOICES, STATE_CHOICES, VenueForm};
use crate::http_server::flash::FlashMessage;
use crate::services::SearchResults;
use crate::services::venue::{VenueArea, VenueDetail, VenueSummary};

fn venue_items(venues: &[VenueSummary]) -> String {
    venues
        .iter()
        .map(|venue| {
            format!(
                r#"<li><a href="/venues/{id}">{name}</a> <span class="upcoming">{count} upcoming</span></li>"#,
                id = venue.id,
                name = escape(&venue.name),
                count = venue.num_upcoming_shows,
            )
        })
        .collect()
}

pub fn list(flashes: &[FlashMessage], areas: &[VenueArea]) -> Html<String> {
    let areas_html: String = areas
        .iter()
        .map(|area| {
            format!(
                r#"<section class="area">
    <h3>{city}, {state}</h3>
    <ul class="items">{items}</ul>
</section>"#,
                city = escape(&area.city),
                state = escape(&area.state),
                items = venue_items(&area.venues),
            )
        })
        .collect();

    let body = format!(
        r#"{search}
<h1>Venues</h1>
{areas_html}"#,
        search = search_box("/venues/search", "Find a venue", ""),
    );
    layout("Venues", flashes, &body)
}

pub fn search_results(
    flashes: &[FlashMessage],
    term: &str,
    results: &SearchResults<VenueSummary>,
) -> Html<String> {
    let body = format!(
        r#"{search}
<h3>Number of search results for "{term}": {count}</h3>
<ul class="items">{items}</ul>"#,
        search = search_box("/venues/search", "Find a venue", term),
        term = escape(term),
        count = results.count,
        items = venue_items(&results.data),
    );
    layout("Venue Search", flashes, &body)
}

pub fn detail(flashes: &[FlashMessage], detail: &VenueDetail) -> Html<String> {
    let venue = &detail.venue;

    let optional_line = |label: &str, value: Option<&str>| match value {
        Some(value) => format!("<p><strong>{label}:</strong> {}</p>", escape(value)),
        None => String::new(),
    };
    let link_line = |label: &str, value: Option<&str>| match value {
        Some(value) => format!(
            r#"<p><a href="{url}" target="_blank" rel="noopener">{label}</a></p>"#,
            url = escape(value)
        ),
        None => String::new(),
    };
    let seeking = if venue.seeking_talent {
        format!(
            r#"<div class="seeking"><p>Currently seeking talent</p><p>{}</p></div>"#,
            escape(venue.seeking_description.as_deref().unwrap_or_default())
        )
    } else {
        r#"<p class="not-seeking">Not currently seeking talent</p>"#.to_string()
    };
    let image = venue
        .image_link
        .as_deref()
        .map(|link| {
            format!(
                r#"<img class="hero" src="{}" alt="{}">"#,
                escape(link),
                escape(&venue.name)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<article class="detail">
    <h1>{name}</h1>
    <p class="subtitle">ID: {id}</p>
    <div class="genres">{genres}</div>
    <p>{address}<br>{city}, {state}</p>
    {phone}
    {website}
    {facebook}
    {seeking}
    {image}
    <div class="actions">
        <a class="button" href="/venues/{id}/edit">Edit</a>
        {delete}
    </div>
</article>
{shows}"#,
        name = escape(&venue.name),
        id = venue.id,
        genres = genre_tags(&detail.genres),
        address = escape(&venue.address),
        city = escape(&venue.city),
        state = escape(&venue.state),
        phone = optional_line("Phone", venue.phone.as_deref()),
        website = link_line("Website", venue.website.as_deref()),
        facebook = link_line("Facebook", venue.facebook_link.as_deref()),
        delete = delete_button(&format!("/venues/{}/delete", venue.id), "Delete venue"),
        shows = show_sections(&detail.shows, "/artists"),
    );
    layout(&venue.name, flashes, &body)
}

/// The create and edit form. `action` is where it posts.
pub fn form(
    flashes: &[FlashMessage],
    heading: &str,
    action: &str,
    form: &VenueForm,
    errors: &FormErrors,
) -> Html<String> {
    let seeking_talent = form.seeking_talent.clone().into_iter().collect::<Vec<_>>();

    let body = format!(
        r#"<form class="form" method="post" action="{action}">
    <h2>{heading}</h2>
    {name}
    {city}
    {state}
    {address}
    {phone}
    {genres}
    {image_link}
    {website}
    {facebook_link}
    {seeking_talent}
    {seeking_description}
    <button type="submit">{heading}</button>
</form>"#,
        heading = escape(heading),
        name = text_field("Name", "name", "text", form.name.as_deref(), errors.get("name")),
        city = text_field("City", "city", "text", form.city.as_deref(), errors.get("city")),
        state = select_field(
            "State",
            "state",
            &choices(STATE_CHOICES),
            &form.state.clone().into_iter().collect::<Vec<_>>(),
            false,
            errors.get("state"),
        ),
        address = text_field(
            "Address",
            "address",
            "text",
            form.address.as_deref(),
            errors.get("address"),
        ),
        phone = text_field("Phone", "phone", "tel", form.phone.as_deref(), errors.get("phone")),
        genres = select_field(
            "Genres",
            "genres",
            &choices(GENRE_CHOICES),
            &form.genres,
            true,
            errors.get("genres"),
        ),
        image_link = text_field(
            "Image link",
            "image_link",
            "url",
            form.image_link.as_deref(),
            errors.get("image_link"),
        ),
        website = text_field(
            "Website",
            "website",
            "url",
            form.website.as_deref(),
            errors.get("website"),
        ),
        facebook_link = text_field(
            "Facebook link",
            "facebook_link",
            "url",
            form.facebook_link.as_deref(),
            errors.get("facebook_link"),
        ),
        seeking_talent = select_field(
            "Seeking talent",
            "seeking_talent",
            &yes_no_choices(),
            &seeking_talent,
            false,
            errors.get("seeking_talent"),
        ),
        seeking_description = textarea_field(
            "Seeking description",
            "seeking_description",
            form.seeking_description.as_deref(),
            errors.get("seeking_description"),
        ),
    );
    layout(heading, flashes, &body)
}
