use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};

use crate::forms::{ArtistForm, FormErrors, SearchForm};
use crate::http_server::{
    error::{HttpError, HttpResult},
    flash,
    state::AppState,
    views,
};

pub async fn list_artists(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let artists = state.artists().list().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::artists::list(&flashes, &artists)))
}

pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(search): Form<SearchForm>,
) -> HttpResult<impl IntoResponse> {
    let results = state.artists().search(&search.search_term).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::artists::search_results(&flashes, &search.search_term, &results),
    ))
}

pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let detail = state
        .artists()
        .get_detail(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("artist {id}")))?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::artists::detail(&flashes, &detail)))
}

pub async fn create_artist_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        views::artists::form(
            &flashes,
            "List a new artist",
            "/artists/create",
            &ArtistForm::default(),
            &FormErrors::default(),
        ),
    )
}

pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> HttpResult<Response> {
    let new_artist = match form.validate() {
        Ok(new_artist) => new_artist,
        Err(errors) => {
            let (jar, flashes) = flash::take(jar);
            let page =
                views::artists::form(&flashes, "List a new artist", "/artists/create", &form, &errors);
            return Ok((StatusCode::BAD_REQUEST, jar, page).into_response());
        }
    };

    let name = new_artist.name.clone();
    let jar = match state.artists().create(new_artist).await {
        Ok(artist) => flash::info(jar, format!("Artist {} was successfully listed!", artist.name)),
        Err(e) => {
            log::error!("Failed to create artist '{}': {:?}", name, e);
            flash::error(
                jar,
                format!("An error occurred. Artist {} could not be listed.", name),
            )
        }
    };
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let artist = state
        .artists()
        .get(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("artist {id}")))?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::artists::form(
            &flashes,
            &format!("Edit artist {}", artist.name),
            &format!("/artists/{id}/edit"),
            &ArtistForm::from_model(&artist),
            &FormErrors::default(),
        ),
    ))
}

pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> HttpResult<Response> {
    let artists = state.artists();
    let artist = artists
        .get(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("artist {id}")))?;

    let changes = match form.validate_changes() {
        Ok(changes) => changes,
        Err(errors) => {
            let (jar, flashes) = flash::take(jar);
            let page = views::artists::form(
                &flashes,
                &format!("Edit artist {}", artist.name),
                &format!("/artists/{id}/edit"),
                &form,
                &errors,
            );
            return Ok((StatusCode::BAD_REQUEST, jar, page).into_response());
        }
    };

    let jar = match artists.update(id, changes).await {
        Ok(Some(updated)) => flash::info(
            jar,
            format!("Artist {} was successfully edited!", updated.name),
        ),
        Ok(None) => return Err(HttpError::not_found(format!("artist {id}"))),
        Err(e) => {
            log::error!("Failed to edit artist {}: {:?}", id, e);
            flash::error(
                jar,
                format!("An error occurred. Artist {} could not be edited.", artist.name),
            )
        }
    };
    Ok((jar, Redirect::to(&format!("/artists/{id}"))).into_response())
}

pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<Response> {
    match state.artists().delete(id).await {
        Ok(Some(artist)) => Ok((
            flash::info(jar, format!("Artist {} was deleted", artist.name)),
            Redirect::to("/artists"),
        )
            .into_response()),
        Ok(None) => Err(HttpError::not_found(format!("artist {id}"))),
        Err(e) => {
            log::error!("Failed to delete artist {}: {:?}", id, e);
            Ok((
                flash::error(jar, format!("An error occurred. Artist {id} could not be deleted.")),
                Redirect::to(&format!("/artists/{id}")),
            )
                .into_response())
        }
    }
}
