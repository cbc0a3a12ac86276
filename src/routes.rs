use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{AllMoviesQuery, GenreOption, MovieForm, MovieQuery, MovieSummary, QualityOption},
    movies::MovieService,
    names,
};

/// Header carrying the authenticated user's id, set by the fronting proxy.
pub const USER_HEADER: &str = "x-user-id";

pub struct CurrentUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CurrentUser(v.to_string()))
            .ok_or(AppError::Unauthenticated)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movies", get(all).post(create))
        .route("/movies/mine", get(mine))
        .route("/movies/{id}", get(details).put(edit).delete(delete))
        .route("/api/movies", get(api_movies))
        .route("/genres", get(genres))
        .route("/qualities", get(qualities))
        .with_state(state)
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Json<MovieQuery>> {
    Ok(Json(state.movies.index().await?))
}

pub async fn all(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AllMoviesQuery>,
) -> AppResult<Json<MovieQuery>> {
    let page = q.page.unwrap_or(1);
    let result = state.movies.list_all(page, state.config.movies_per_page, &q.search).await?;
    Ok(Json(result))
}

pub async fn mine(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MovieQuery>> {
    Ok(Json(state.movies.list_mine(&user).await?))
}

pub async fn details(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> AppResult<Response> {
    Ok(match state.movies.details(id).await? {
        Some(movie) => Json(movie).into_response(),
        None => not_found(),
    })
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<MovieForm>,
) -> AppResult<Response> {
    validate(&state.movies, &form).await?;

    let directors = names::split_list(&form.directors);
    let actors = names::split_list(&form.actors);
    let id = state.movies.create(&directors, &user, &form, &actors).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(form): Json<MovieForm>,
) -> AppResult<Response> {
    validate(&state.movies, &form).await?;

    let directors = names::split_list(&form.directors);
    let actors = names::split_list(&form.actors);
    if state.movies.edit(id, &directors, &user, &form, &actors).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(not_found())
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if state.movies.delete(id, &user).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(not_found())
    }
}

pub async fn api_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<MovieSummary>>> {
    Ok(Json(state.movies.list_all_api().await?))
}

pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<GenreOption>>> {
    Ok(Json(state.movies.genre_categories().await?))
}

pub async fn qualities(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<QualityOption>>> {
    Ok(Json(state.movies.qualities().await?))
}

/// Form checks the service leaves to its caller.
async fn validate(movies: &MovieService, form: &MovieForm) -> AppResult<()> {
    if form.title.trim().is_empty() {
        return Err(AppError::validation("title", "Title is required."));
    }
    if names::split_list(&form.directors).is_empty() {
        return Err(AppError::validation("directors", "At least one director is required."));
    }
    if names::split_list(&form.actors).is_empty() {
        return Err(AppError::validation("actors", "At least one actor is required."));
    }
    if !movies.genre_exists(form.genre_id).await? {
        return Err(AppError::validation("genre_id", "Genre does not exist."));
    }
    if !movies.quality_exists(form.quality_id).await? {
        return Err(AppError::validation("quality_id", "Quality does not exist."));
    }
    Ok(())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "movie not found" }))).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, db::test_db, statistics::StatisticsService};

    async fn app() -> Router {
        let db = test_db().await;
        let config = Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            movies_per_page: 3,
        };
        let movies = MovieService::new(db.clone(), StatisticsService::new(db));
        router(Arc::new(AppState { config: Arc::new(config), movies }))
    }

    fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn movie_json(title: &str, genre_id: i32) -> Value {
        json!({
            "title": title,
            "year": 1999,
            "image_url": "https://img.example/m.jpg",
            "watch_url": "https://watch.example/m",
            "country": "USA",
            "directors": "Lana Wachowski, Lilly Wachowski",
            "actors": "Keanu Reeves, Carrie-Anne Moss",
            "duration": 136,
            "age_limit": 16,
            "description": "Red pill or blue pill.",
            "genre_id": genre_id,
            "quality_id": 3,
        })
    }

    #[tokio::test]
    async fn test_create_then_fetch_details() {
        let app = app().await;

        let (status, body) =
            send(&app, request(Method::POST, "/movies", Some("neo"), Some(movie_json("The Matrix", 11))))
                .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&app, request(Method::GET, &format!("/movies/{id}"), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "The Matrix");
        assert_eq!(body["directors"], "Lana Wachowski, Lilly Wachowski");
        assert_eq!(body["genre"], "Sci-Fi");
        assert_eq!(body["quality"], "Full HD");
    }

    #[tokio::test]
    async fn test_mutations_require_user() {
        let app = app().await;

        let (status, _) =
            send(&app, request(Method::POST, "/movies", None, Some(movie_json("The Matrix", 11)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, request(Method::GET, "/movies/mine", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_genre_is_rejected_before_edit() {
        let app = app().await;
        let (_, body) =
            send(&app, request(Method::POST, "/movies", Some("neo"), Some(movie_json("The Matrix", 11))))
                .await;
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            request(Method::PUT, &format!("/movies/{id}"), Some("neo"), Some(movie_json("Changed", 999))),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "genre_id");

        let (_, body) = send(&app, request(Method::GET, &format!("/movies/{id}"), None, None)).await;
        assert_eq!(body["title"], "The Matrix");
    }

    #[tokio::test]
    async fn test_malformed_name_is_unprocessable() {
        let app = app().await;
        let mut movie = movie_json("Solo", 1);
        movie["actors"] = json!("Keanu Reeves, Zendaya");

        let (status, body) = send(&app, request(Method::POST, "/movies", Some("neo"), Some(movie))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("Zendaya"));
    }

    #[tokio::test]
    async fn test_edit_and_delete_status_codes() {
        let app = app().await;
        let (_, body) =
            send(&app, request(Method::POST, "/movies", Some("neo"), Some(movie_json("The Matrix", 11))))
                .await;
        let id = body["id"].as_i64().unwrap();
        let uri = format!("/movies/{id}");

        let (status, _) =
            send(&app, request(Method::PUT, "/movies/9999", Some("neo"), Some(movie_json("X", 1)))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send(&app, request(Method::PUT, &uri, Some("neo"), Some(movie_json("Reloaded", 11)))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("smith"), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("neo"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, request(Method::DELETE, &uri, Some("neo"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listing_uses_configured_page_size() {
        let app = app().await;
        for i in 0..5 {
            send(
                &app,
                request(Method::POST, "/movies", Some("neo"), Some(movie_json(&format!("M{i}"), 1))),
            )
            .await;
        }

        let (status, body) = send(&app, request(Method::GET, "/movies?page=2", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movies"].as_array().unwrap().len(), 2);
        assert_eq!(body["movies"][0]["title"], "M1");
        assert_eq!(body["total_movies"], 5);
        assert_eq!(body["page_size"], 3);

        let (status, body) =
            send(&app, request(Method::GET, "/movies?page=18446744073709551615", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["movies"].as_array().unwrap().is_empty());

        let (_, body) = send(&app, request(Method::GET, "/movies?search=m4", None, None)).await;
        assert_eq!(body["matching_movies"], 1);

        let (_, body) = send(&app, request(Method::GET, "/api/movies", None, None)).await;
        assert_eq!(body[0]["title"], "M0");

        let (_, body) = send(&app, request(Method::GET, "/movies/mine", Some("neo"), None)).await;
        assert_eq!(body["total_movies"], 5);

        let (_, body) = send(&app, request(Method::GET, "/genres", None, None)).await;
        assert_eq!(body[0]["name"], "Action");
    }
}
