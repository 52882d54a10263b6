use crate::{
    config::AppConfig,
    services::{geocode::GeocodeService, store::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: TripStore,
    pub geocoder: GeocodeService,
}

impl AppState {
    pub fn new(config: AppConfig, store: TripStore, geocoder: GeocodeService) -> Self {
        Self {
            config,
            store,
            geocoder,
        }
    }
}
