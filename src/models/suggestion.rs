use serde::{Deserialize, Serialize};

/// A transient geocoded candidate; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub place: String,
    pub lat: f64,
    pub lng: f64,
}
