pub mod geocode;
pub mod store;
