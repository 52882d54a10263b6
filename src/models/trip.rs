use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One recorded visit, owned by a single browser identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub place: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    pub fn new(user_id: impl Into<String>, place: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            place: place.into(),
            date,
            note: None,
            lat: None,
            lng: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Partial update for an existing trip. Fields that are absent stay
/// untouched; `id` and `userId` are deliberately not patchable, and any
/// unknown body field is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripPatch {
    pub place: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    #[serde(default, deserialize_with = "coord_lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "coord_lenient")]
    pub lng: Option<f64>,
}

impl TripPatch {
    /// Shallow-merges the present fields onto `trip` and stamps
    /// `updated_at`. An empty-string note clears the note.
    pub fn apply(self, trip: &mut Trip) {
        if let Some(place) = self.place {
            trip.place = place;
        }
        if let Some(date) = self.date {
            trip.date = date;
        }
        if let Some(note) = self.note {
            let trimmed = note.trim();
            trip.note = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(lat) = self.lat {
            trip.lat = Some(lat);
        }
        if let Some(lng) = self.lng {
            trip.lng = Some(lng);
        }
        trip.updated_at = Some(Utc::now());
    }
}

/// Accepts a coordinate as a JSON number or a numeric string; anything
/// unparseable collapses to `None` instead of failing the request.
pub fn coord_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Raw::Num(n) if n.is_finite() => Some(n),
        Raw::Num(_) => None,
        Raw::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
    }))
}
