use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use crate::{error::AppError, models::suggestion::Suggestion};

const MAPBOX_BASE: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";
const RESULT_LIMIT: usize = 5;

/// Forward-geocoding client for the autocomplete proxy. Results are
/// restricted to country/place-level hits and capped at five.
#[derive(Clone)]
pub struct GeocodeService {
    http: reqwest::Client,
    token: Arc<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<Feature>,
}

/// Mapbox returns `center` as `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct Feature {
    place_name: String,
    center: [f64; 2],
}

impl GeocodeService {
    pub fn new(token: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self {
            http,
            token: Arc::new(token),
        })
    }

    /// Empty or whitespace queries short-circuit to an empty list without
    /// contacting the upstream service. Upstream failures are not retried.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<Suggestion>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.request_url(query)?;
        let response = self.http.get(url).send().await.map_err(|err| {
            warn!("geocoding request failed: {err}");
            AppError::ServiceUnavailable
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "geocoding upstream returned error");
            return Err(AppError::ServiceUnavailable);
        }

        let body: GeocodeResponse = response.json().await.map_err(|err| {
            warn!("geocoding response unreadable: {err}");
            AppError::ServiceUnavailable
        })?;

        Ok(map_features(body))
    }

    fn request_url(&self, query: &str) -> Result<Url, AppError> {
        let mut url =
            Url::parse(MAPBOX_BASE).map_err(|err| AppError::Other(err.into()))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Other(anyhow!("invalid geocoding base url")))?
            .pop_if_empty()
            .push(&format!("{query}.json"));
        url.query_pairs_mut()
            .append_pair("types", "country,place")
            .append_pair("limit", &RESULT_LIMIT.to_string())
            .append_pair("access_token", &self.token);
        Ok(url)
    }
}

fn map_features(body: GeocodeResponse) -> Vec<Suggestion> {
    body.features
        .into_iter()
        .take(RESULT_LIMIT)
        .map(|f| Suggestion {
            place: f.place_name,
            lat: f.center[1],
            lng: f.center[0],
        })
        .collect()
}
