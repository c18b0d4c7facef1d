use std::{path::PathBuf, sync::Arc, time::Instant};

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower_http::services::ServeDir;

use crate::{
    database::Database,
    http_server::{
        routes::{self, artists, home, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
    pub static_dir: PathBuf,
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

pub fn build_router(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    let venue_routes: Router<Arc<AppState>> = Router::new()
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/venues/{id}",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/venues/{id}/edit",
            get(venues::edit_venue_form).post(venues::edit_venue_submission),
        )
        .route("/venues/{id}/delete", post(venues::delete_venue));

    let artist_routes: Router<Arc<AppState>> = Router::new()
        .route("/artists", get(artists::list_artists))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route(
            "/artists/{id}",
            get(artists::show_artist).delete(artists::delete_artist),
        )
        .route(
            "/artists/{id}/edit",
            get(artists::edit_artist_form).post(artists::edit_artist_submission),
        )
        .route("/artists/{id}/delete", post(artists::delete_artist));

    let show_routes: Router<Arc<AppState>> = Router::new()
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )
        .route("/shows/{id}/delete", post(shows::delete_show));

    Router::new()
        .route("/", get(home::index))
        .merge(venue_routes)
        .merge(artist_routes)
        .merge(show_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let HttpServerConfig {
        port,
        database,
        static_dir,
    } = config;

    let app_state = Arc::new(AppState {
        db: Arc::new(database),
    });
    let app = build_router(app_state, static_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities;
    use crate::seed::seed_demo_data;
    use crate::test_utils::test_db;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use sea_orm::{EntityTrait, PaginatorTrait};
    use tower::util::ServiceExt;

    async fn setup_app() -> (Router, Arc<Database>) {
        let db = test_db().await;
        seed_demo_data(&db).await.unwrap();
        let state = Arc::new(AppState { db: db.clone() });
        (build_router(state, PathBuf::from("static")), db)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn flash_cookie(response: &Response) -> String {
        let cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("flash="))
            .expect("flash cookie is set")
            .to_string();
        let value = cookie["flash=".len()..].split(';').next().unwrap_or_default();
        urlencoding::decode(value).unwrap().into_owned()
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _) = setup_app().await;

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Gigboard"));
    }

    #[tokio::test]
    async fn test_venue_list_groups_areas() {
        let (app, _) = setup_app().await;

        let response = app.oneshot(get_request("/venues")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("San Francisco, CA"));
        assert!(body.contains("New York, NY"));
        assert!(body.contains("Park Square Live Music &amp; Coffee"));
    }

    #[tokio::test]
    async fn test_unknown_venue_is_404() {
        let (app, _) = setup_app().await;

        let response = app.oneshot(get_request("/venues/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (app, _) = setup_app().await;

        let response = app.oneshot(get_request("/nowhere")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_venue_detail_shows_partitions() {
        let (app, db) = setup_app().await;
        let park_square = entities::venue::Entity::find_by_id(3)
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(park_square.name, "Park Square Live Music & Coffee");

        let response = app.oneshot(get_request("/venues/3")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("3 Upcoming Shows"));
        assert!(body.contains("1 Past Show"));
        assert!(body.contains("Matt Quevedo"));
    }

    #[tokio::test]
    async fn test_search_venues() {
        let (app, _) = setup_app().await;

        let response = app
            .oneshot(form_request("POST", "/venues/search", "search_term=Hop"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"Number of search results for "Hop": 1"#));
        assert!(body.contains("The Musical Hop"));
        assert!(!body.contains("Dueling Pianos"));
    }

    #[tokio::test]
    async fn test_search_artists() {
        let (app, _) = setup_app().await;

        let response = app
            .oneshot(form_request("POST", "/artists/search", "search_term=band"))
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains(r#"Number of search results for "band": 1"#));
        assert!(body.contains("The Wild Sax Band"));
    }

    #[tokio::test]
    async fn test_create_venue_redirects_with_flash() {
        let (app, db) = setup_app().await;
        let form = "name=The+Blue+Door&city=Seattle&state=WA&address=1+Pike+Place\
                    &phone=206-555-0100&genres=Blues&genres=Soul&seeking_talent=y";

        let response = app
            .oneshot(form_request("POST", "/venues/create", form))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(flash_cookie(&response).contains("Venue The Blue Door was successfully listed!"));

        let venues = entities::venue::Entity::find().all(&db.conn).await.unwrap();
        let created = venues.iter().find(|v| v.name == "The Blue Door").unwrap();
        assert_eq!(created.genres, "Blues,Soul");
        assert!(created.seeking_talent);
    }

    #[tokio::test]
    async fn test_invalid_venue_rerenders_form() {
        let (app, db) = setup_app().await;

        let response = app
            .oneshot(form_request(
                "POST",
                "/venues/create",
                "name=Nowhere&city=&state=ZZ&address=1+Main&genres=Jazz&phone=12",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("This field is required."));
        assert!(body.contains("Invalid phone number"));
        assert!(body.contains(r#"value="Nowhere""#));
        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_edit_artist_keeps_unsubmitted_fields() {
        let (app, db) = setup_app().await;

        let response = app
            .oneshot(form_request("POST", "/artists/2/edit", "city=Brooklyn"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/artists/2");
        let artist = entities::artist::Entity::find_by_id(2)
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artist.name, "Matt Quevedo");
        assert_eq!(artist.city, "Brooklyn");
        assert_eq!(artist.genres, "Jazz");
    }

    #[tokio::test]
    async fn test_edit_venue_without_seeking_talent_keeps_it() {
        let (app, db) = setup_app().await;

        let response = app
            .oneshot(form_request("POST", "/venues/1/edit", "name=The+Hop"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/venues/1");
        let venue = entities::venue::Entity::find_by_id(1)
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(venue.name, "The Hop");
        assert!(venue.seeking_talent);
        assert_eq!(venue.city, "San Francisco");
        assert_eq!(venue.genres, "Jazz,Reggae,Swing,Classical,Folk");
    }

    #[tokio::test]
    async fn test_flash_cookie_is_rendered_on_next_page() {
        let (app, _) = setup_app().await;

        let response = app
            .clone()
            .oneshot(form_request("POST", "/venues/3/delete", ""))
            .await
            .unwrap();
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("flash="))
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let request = Request::builder()
            .uri("/venues")
            .header(header::COOKIE, pair)
            .body(Body::empty())
            .unwrap();
        let body = body_text(app.oneshot(request).await.unwrap()).await;
        assert!(body.contains("Venue Park Square Live Music &amp; Coffee was deleted"));
    }

    #[tokio::test]
    async fn test_delete_venue_routes() {
        let (app, db) = setup_app().await;

        let response = app
            .clone()
            .oneshot(form_request("DELETE", "/venues/1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/venues");
        assert!(flash_cookie(&response).contains("Venue The Musical Hop was deleted"));

        let response = app
            .clone()
            .oneshot(form_request("POST", "/venues/2/delete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(form_request("POST", "/venues/2/delete", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 1);
        // Only Park Square's shows remain
        assert_eq!(entities::show::Entity::find().count(&db.conn).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_create_show_for_missing_artist_flashes_error() {
        let (app, db) = setup_app().await;

        let response = app
            .oneshot(form_request(
                "POST",
                "/shows/create",
                "artist_id=99&venue_id=1&start_time=2040-01-01T20%3A00",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(flash_cookie(&response).contains("Show could not be listed."));
        assert_eq!(entities::show::Entity::find().count(&db.conn).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let (app, _) = setup_app().await;
        let json = r#"[{"level":"info","message":"Show was successfully listed!"}]"#;
        let request = Request::builder()
            .uri("/shows")
            .header(header::COOKIE, format!("flash={}", urlencoding::encode(json)))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        let cleared = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("flash=;") || v.starts_with("flash=\"\""));
        assert!(cleared);
        assert!(body_text(response).await.contains("Show was successfully listed!"));
    }
}
