//! HTML pages, built with `format!`.
//!
//! Every value that comes from the database or a request goes through
//! [`escape`] before it is interpolated.

use axum::response::Html;

use crate::datetime_format::{DateFormat, format_datetime};
use crate::forms::FieldError;
use crate::http_server::flash::{FlashLevel, FlashMessage};
use crate::services::show::{ShowAppearance, ShowPartition};

pub mod artists;
pub mod errors;
pub mod home;
pub mod shows;
pub mod venues;

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_flashes(flashes: &[FlashMessage]) -> String {
    flashes
        .iter()
        .map(|flash| {
            let class = match flash.level {
                FlashLevel::Info => "flash flash-info",
                FlashLevel::Error => "flash flash-error",
            };
            format!(
                r#"<div class="{class}" role="alert">{}</div>"#,
                escape(&flash.message)
            )
        })
        .collect()
}

/// Wrap `body` in the site chrome: nav, search box and queued flash messages.
pub fn layout(title: &str, flashes: &[FlashMessage], body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Gigboard</title>
    <link rel="stylesheet" href="/static/main.css">
</head>
<body>
    <header>
        <nav>
            <a class="brand" href="/">Gigboard</a>
            <a href="/venues">Venues</a>
            <a href="/artists">Artists</a>
            <a href="/shows">Shows</a>
            <span class="nav-right">
                <a href="/venues/create">Post a venue</a>
                <a href="/artists/create">Post an artist</a>
                <a href="/shows/create">Post a show</a>
            </span>
        </nav>
    </header>
    <main>
        {flashes}
        {body}
    </main>
</body>
</html>
"#,
        title = escape(title),
        flashes = render_flashes(flashes),
    ))
}

pub fn search_box(action: &str, placeholder: &str, term: &str) -> String {
    format!(
        r#"<form class="search" method="post" action="{action}">
    <input type="search" name="search_term" placeholder="{placeholder}" value="{term}" aria-label="Search">
    <button type="submit">Search</button>
</form>"#,
        term = escape(term),
    )
}

/// A `<time>` element showing the medium format, with the full one on hover.
pub fn when(start_time: &chrono::DateTime<chrono::Utc>) -> String {
    format!(
        r#"<time datetime="{}" title="{}">{}</time>"#,
        start_time.to_rfc3339(),
        escape(&format_datetime(start_time, DateFormat::Full)),
        escape(&format_datetime(start_time, DateFormat::Medium)),
    )
}

fn image(link: Option<&str>, alt: &str) -> String {
    match link {
        Some(link) => format!(
            r#"<img src="{}" alt="{}">"#,
            escape(link),
            escape(alt)
        ),
        None => String::new(),
    }
}

fn show_cards(heading: &str, count: usize, shows: &[ShowAppearance], base: &str) -> String {
    let cards: String = shows
        .iter()
        .map(|show| {
            format!(
                r#"<li class="show-card">
    {image}
    <a href="{base}/{id}">{name}</a>
    {time}
</li>"#,
                image = image(show.counterpart_image_link.as_deref(), &show.counterpart_name),
                id = show.counterpart_id,
                name = escape(&show.counterpart_name),
                time = when(&show.start_time),
            )
        })
        .collect();

    format!(
        r#"<section class="shows">
    <h3>{count} {heading} {noun}</h3>
    <ul>{cards}</ul>
</section>"#,
        noun = if count == 1 { "Show" } else { "Shows" },
    )
}

/// Upcoming then past shows on a detail page. `base` is where counterpart
/// links point, e.g. `/artists`.
pub fn show_sections(shows: &ShowPartition, base: &str) -> String {
    format!(
        "{}\n{}",
        show_cards("Upcoming", shows.upcoming_count(), &shows.upcoming, base),
        show_cards("Past", shows.past_count(), &shows.past, base),
    )
}

pub fn genre_tags(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| format!(r#"<span class="genre">{}</span>"#, escape(g)))
        .collect()
}

pub fn delete_button(action: &str, label: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{action}">
    <button type="submit" class="danger">{}</button>
</form>"#,
        escape(label)
    )
}

fn errors_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(&e.to_string())))
        .collect();
    format!(r#"<ul class="field-errors">{items}</ul>"#)
}

pub fn text_field(
    label: &str,
    name: &str,
    kind: &str,
    value: Option<&str>,
    errors: &[FieldError],
) -> String {
    format!(
        r#"<div class="field">
    <label for="{name}">{label}</label>
    <input type="{kind}" id="{name}" name="{name}" value="{value}">
    {errors}
</div>"#,
        value = escape(value.unwrap_or_default()),
        errors = errors_list(errors),
    )
}

pub fn textarea_field(label: &str, name: &str, value: Option<&str>, errors: &[FieldError]) -> String {
    format!(
        r#"<div class="field">
    <label for="{name}">{label}</label>
    <textarea id="{name}" name="{name}">{value}</textarea>
    {errors}
</div>"#,
        value = escape(value.unwrap_or_default()),
        errors = errors_list(errors),
    )
}

/// `options` are `(value, label)` pairs; any whose value is in `selected`
/// is pre-selected.
pub fn select_field(
    label: &str,
    name: &str,
    options: &[(String, String)],
    selected: &[String],
    multiple: bool,
    errors: &[FieldError],
) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                if selected.contains(value) { " selected" } else { "" },
                escape(text),
            )
        })
        .collect();

    format!(
        r#"<div class="field">
    <label for="{name}">{label}</label>
    <select id="{name}" name="{name}"{multiple}>{options}</select>
    {errors}
</div>"#,
        multiple = if multiple { " multiple" } else { "" },
        errors = errors_list(errors),
    )
}

pub fn choices(values: &[&str]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (v.to_string(), v.to_string()))
        .collect()
}

pub fn yes_no_choices() -> Vec<(String, String)> {
    vec![("n".into(), "No".into()), ("y".into(), "Yes".into())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
        assert_eq!(escape("Park Square"), "Park Square");
    }

    #[test]
    fn test_layout_renders_flashes_escaped() {
        let flashes = vec![FlashMessage {
            level: FlashLevel::Error,
            message: "<script>".into(),
        }];
        let Html(page) = layout("Venues", &flashes, "<p>body</p>");
        assert!(page.contains(r#"<div class="flash flash-error" role="alert">&lt;script&gt;</div>"#));
        assert!(page.contains("<p>body</p>"));
        assert!(page.contains("<title>Venues | Gigboard</title>"));
    }

    #[test]
    fn test_select_marks_selected_options() {
        let html = select_field(
            "Genres",
            "genres",
            &choices(&["Jazz", "R&B", "Soul"]),
            &["R&B".to_string(), "Soul".to_string()],
            true,
            &[],
        );
        assert!(html.contains(r#"<option value="Jazz">Jazz</option>"#));
        assert!(html.contains(r#"<option value="R&amp;B" selected>R&amp;B</option>"#));
        assert!(html.contains(" multiple>"));
    }

    #[test]
    fn test_show_sections_headings() {
        let shows = ShowPartition {
            past: vec![ShowAppearance {
                show_id: 1,
                counterpart_id: 2,
                counterpart_name: "Matt Quevedo".into(),
                counterpart_image_link: None,
                start_time: crate::test_utils::utc(2019, 6, 15, 23, 0),
            }],
            upcoming: Vec::new(),
        };

        let html = show_sections(&shows, "/artists");
        assert!(html.contains("<h3>0 Upcoming Shows</h3>"));
        assert!(html.contains("<h3>1 Past Show</h3>"));
        assert!(html.contains(r#"<a href="/artists/2">Matt Quevedo</a>"#));
    }
}
