use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};

use crate::forms::{FormErrors, ShowForm};
use crate::http_server::{
    error::{HttpError, HttpResult},
    flash,
    state::AppState,
    views,
};

pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    let shows = state.shows().list().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::shows::list(&flashes, &shows)))
}

async fn render_form(
    state: &AppState,
    jar: CookieJar,
    form: &ShowForm,
    errors: &FormErrors,
) -> HttpResult<(CookieJar, axum::response::Html<String>)> {
    let venues = state.venues().list_all().await?;
    let artists = state.artists().list_all().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::shows::form(&flashes, form, errors, &venues, &artists),
    ))
}

pub async fn create_show_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> HttpResult<impl IntoResponse> {
    render_form(&state, jar, &ShowForm::default(), &FormErrors::default()).await
}

pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> HttpResult<Response> {
    let new_show = match form.validate() {
        Ok(new_show) => new_show,
        Err(errors) => {
            let page = render_form(&state, jar, &form, &errors).await?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let jar = match state.shows().create(new_show).await {
        Ok(_) => flash::info(jar, "Show was successfully listed!"),
        Err(e) => {
            log::error!("Failed to create show: {:?}", e);
            flash::error(jar, "An error occurred. Show could not be listed.")
        }
    };
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> HttpResult<Response> {
    let jar = match state.shows().delete(id).await {
        Ok(Some(_)) => flash::info(jar, "Show was deleted"),
        Ok(None) => return Err(HttpError::not_found(format!("show {id}"))),
        Err(e) => {
            log::error!("Failed to delete show {}: {:?}", id, e);
            flash::error(jar, "An error occurred. Show could not be deleted.")
        }
    };
    Ok((jar, Redirect::to("/shows")).into_response())
}
