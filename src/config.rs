use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub db_file: PathBuf,
    pub mapbox_token: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:4000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let db_file = env::var("DB_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("db.json"));

        let mapbox_token = env::var("MAPBOX_TOKEN")
            .map_err(|_| AppError::Config("MAPBOX_TOKEN must be set".into()))?;

        Ok(Self {
            listen_addr,
            db_file,
            mapbox_token,
        })
    }
}
