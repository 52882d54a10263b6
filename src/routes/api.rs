use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    models::trip::{coord_lenient, Trip, TripPatch},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/:id", put(update_trip))
        .route("/autocomplete", get(autocomplete))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("userId required"))?;
    let trips = state.store.list(user_id).await;
    Ok(Json(trips))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTripBody {
    user_id: Option<String>,
    place: Option<String>,
    date: Option<NaiveDate>,
    note: Option<String>,
    #[serde(default, deserialize_with = "coord_lenient")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "coord_lenient")]
    lng: Option<f64>,
}

async fn create_trip(
    State(state): State<AppState>,
    Json(body): Json<CreateTripBody>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = required(body.user_id)?;
    let place = required(body.place)?;
    let date = body
        .date
        .ok_or_else(|| AppError::bad_request("userId, place, date required"))?;

    let mut trip = Trip::new(user_id, place, date);
    trip.note = normalize_optional(body.note);
    trip.lat = body.lat;
    trip.lng = body.lng;

    let created = state.store.insert(trip).await?;
    info!(id = %created.id, place = %created.place, "trip created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TripPatch>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.store.update(&id, patch).await?;
    info!(id = %updated.id, "trip updated");
    Ok(Json(updated))
}

#[derive(Deserialize)]
struct AutocompleteQuery {
    #[serde(default)]
    q: String,
}

async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let suggestions = state.geocoder.autocomplete(&query.q).await?;
    Ok(Json(suggestions))
}

fn required(input: Option<String>) -> Result<String, AppError> {
    normalize_optional(input).ok_or_else(|| AppError::bad_request("userId, place, date required"))
}

fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::{
        config::AppConfig,
        routes::create_router,
        services::{geocode::GeocodeService, store::TripStore},
        state::AppState,
    };

    async fn test_app() -> (Router, TempDir) {
        let root = TempDir::new().unwrap();
        let db_file = root.path().join("db.json");
        let config = AppConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_file: db_file.clone(),
            mapbox_token: "test-token".into(),
        };
        let store = TripStore::open(db_file).await.unwrap();
        let geocoder = GeocodeService::new(config.mapbox_token.clone()).unwrap();
        let app = create_router(AppState::new(config, store, geocoder));
        (app, root)
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_without_user_id_is_bad_request() {
        let (app, _root) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/trips").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_with_blank_user_id_is_bad_request() {
        let (app, _root) = test_app().await;
        let response = app
            .oneshot(
                Request::get("/api/trips?userId=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_without_date_is_bad_request() {
        let (app, _root) = test_app().await;
        let request = json_post("/api/trips", r#"{"userId":"u1","place":"Rome"}"#);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_with_blank_place_is_bad_request() {
        let (app, _root) = test_app().await;
        let request = json_post(
            "/api/trips",
            r#"{"userId":"u1","place":"   ","date":"2024-05-01"}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_with_required_fields_is_created() {
        let (app, _root) = test_app().await;
        let request = json_post(
            "/api/trips",
            r#"{"userId":"u1","place":"Rome","date":"2024-05-01"}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn normalize_optional_trims_and_drops_blanks() {
        assert_eq!(super::normalize_optional(None), None);
        assert_eq!(super::normalize_optional(Some("  ".into())), None);
        assert_eq!(
            super::normalize_optional(Some("  Rome ".into())),
            Some("Rome".into())
        );
    }
}
