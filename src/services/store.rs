use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::{
    error::AppError,
    models::trip::{Trip, TripPatch},
};

/// The on-disk shape: one document with a single top-level `trips` array.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    trips: Vec<Trip>,
}

/// Repository over a single JSON document. The whole collection lives in
/// memory and is rewritten in full on every mutation; the mutex serializes
/// read-modify-write so concurrent saves cannot drop each other's changes.
#[derive(Clone)]
pub struct TripStore {
    path: Arc<PathBuf>,
    trips: Arc<Mutex<Vec<Trip>>>,
}

impl TripStore {
    /// Reads the backing document, or starts empty when it does not exist.
    pub async fn open(path: PathBuf) -> Result<Self, AppError> {
        let trips = if fs::try_exists(&path).await? {
            let raw = fs::read(&path).await?;
            if raw.is_empty() {
                Vec::new()
            } else {
                let doc: Document =
                    serde_json::from_slice(&raw).map_err(|err| AppError::Other(err.into()))?;
                doc.trips
            }
        } else {
            Vec::new()
        };
        debug!(count = trips.len(), path = %path.display(), "trip store opened");

        Ok(Self {
            path: Arc::new(path),
            trips: Arc::new(Mutex::new(trips)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All trips owned by `user_id`, ascending by visit date.
    pub async fn list(&self, user_id: &str) -> Vec<Trip> {
        let trips = self.trips.lock().await;
        let mut owned: Vec<Trip> = trips
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.date);
        owned
    }

    /// Appends a new trip and persists the full collection.
    pub async fn insert(&self, trip: Trip) -> Result<Trip, AppError> {
        let mut trips = self.trips.lock().await;
        trips.push(trip.clone());
        self.persist(&trips).await?;
        Ok(trip)
    }

    /// Merges `patch` onto the trip with the given id and persists.
    /// Never creates a record.
    pub async fn update(&self, id: &str, patch: TripPatch) -> Result<Trip, AppError> {
        let mut trips = self.trips.lock().await;
        let trip = trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound)?;
        patch.apply(trip);
        let updated = trip.clone();
        self.persist(&trips).await?;
        Ok(updated)
    }

    /// Full-document rewrite via a temp file so a crash mid-write cannot
    /// truncate the live document.
    async fn persist(&self, trips: &[Trip]) -> Result<(), AppError> {
        let doc = Document {
            trips: trips.to_vec(),
        };
        let data = serde_json::to_vec_pretty(&doc).map_err(|err| AppError::Other(err.into()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, self.path.as_ref()).await?;
        Ok(())
    }
}
