use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};

use crate::forms::{FormErrors, SearchForm, VenueForm};
use crate::http_server::{
    error::{HttpError, HttpResult},
    flash,
    state::AppState,
    views,
};

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let areas = state.venues().list_areas().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::venues::list(&flashes, &areas)))
}

pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(search): Form<SearchForm>,
) -> HttpResult<impl IntoResponse> {
    let results = state.venues().search(&search.search_term).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::venues::search_results(&flashes, &search.search_term, &results),
    ))
}

pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let detail = state
        .venues()
        .get_detail(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("venue {id}")))?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::venues::detail(&flashes, &detail)))
}

pub async fn create_venue_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        views::venues::form(
            &flashes,
            "List a new venue",
            "/venues/create",
            &VenueForm::default(),
            &FormErrors::default(),
        ),
    )
}

pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> HttpResult<Response> {
    let new_venue = match form.validate() {
        Ok(new_venue) => new_venue,
        Err(errors) => {
            let (jar, flashes) = flash::take(jar);
            let page =
                views::venues::form(&flashes, "List a new venue", "/venues/create", &form, &errors);
            return Ok((StatusCode::BAD_REQUEST, jar, page).into_response());
        }
    };

    let name = new_venue.name.clone();
    let jar = match state.venues().create(new_venue).await {
        Ok(venue) => flash::info(jar, format!("Venue {} was successfully listed!", venue.name)),
        Err(e) => {
            log::error!("Failed to create venue '{}': {:?}", name, e);
            flash::error(
                jar,
                format!("An error occurred. Venue {} could not be listed.", name),
            )
        }
    };
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let venue = state
        .venues()
        .get(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("venue {id}")))?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::venues::form(
            &flashes,
            &format!("Edit venue {}", venue.name),
            &format!("/venues/{id}/edit"),
            &VenueForm::from_model(&venue),
            &FormErrors::default(),
        ),
    ))
}

pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> HttpResult<Response> {
    let venues = state.venues();
    let venue = venues
        .get(id)
        .await?
        .ok_or_else(|| HttpError::not_found(format!("venue {id}")))?;

    let changes = match form.validate_changes() {
        Ok(changes) => changes,
        Err(errors) => {
            let (jar, flashes) = flash::take(jar);
            let page = views::venues::form(
                &flashes,
                &format!("Edit venue {}", venue.name),
                &format!("/venues/{id}/edit"),
                &form,
                &errors,
            );
            return Ok((StatusCode::BAD_REQUEST, jar, page).into_response());
        }
    };

    let jar = match venues.update(id, changes).await {
        Ok(Some(updated)) => flash::info(
            jar,
            format!("Venue {} was successfully edited!", updated.name),
        ),
        Ok(None) => return Err(HttpError::not_found(format!("venue {id}"))),
        Err(e) => {
            log::error!("Failed to edit venue {}: {:?}", id, e);
            flash::error(
                jar,
                format!("An error occurred. Venue {} could not be edited.", venue.name),
            )
        }
    };
    Ok((jar, Redirect::to(&format!("/venues/{id}"))).into_response())
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<Response> {
    match state.venues().delete(id).await {
        Ok(Some(venue)) => Ok((
            flash::info(jar, format!("Venue {} was deleted", venue.name)),
            Redirect::to("/venues"),
        )
            .into_response()),
        Ok(None) => Err(HttpError::not_found(format!("venue {id}"))),
        Err(e) => {
            log::error!("Failed to delete venue {}: {:?}", id, e);
            Ok((
                flash::error(jar, format!("An error occurred. Venue {id} could not be deleted.")),
                Redirect::to(&format!("/venues/{id}")),
            )
                .into_response())
        }
    }
}
