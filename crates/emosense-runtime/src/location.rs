//! Geolocation and map display
//!
//! One-shot: ask for the position once, print it, and center a map on it.
//! Nothing here repeats.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::{MapConfig, TextSink};

/// Geographic position in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Position rounded to four decimal places, as displayed
    pub fn rounded(&self) -> Position {
        let round = |v: f64| (v * 10_000.0).round() / 10_000.0;
        Position::new(round(self.latitude), round(self.longitude))
    }
}

/// Geolocation failures; the messages are shown to the user as-is
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    #[error("Location access denied.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("The request to get user location timed out.")]
    Timeout,

    #[error("An unknown error occurred.")]
    Unknown,

    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
}

/// Geolocation capability
#[async_trait]
pub trait Geolocation: Send + Sync {
    async fn request_position(&self) -> Result<Position, GeoError>;
}

/// Map marker with a popup
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: Position,
    pub popup: String,
}

/// Everything a map widget needs to show the user's position
#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub marker: Marker,
}

impl MapView {
    pub fn centered_on(position: Position, config: &MapConfig) -> Self {
        MapView {
            center: position,
            zoom: config.zoom,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
            marker: Marker {
                position,
                popup: config.popup.clone(),
            },
        }
    }
}

/// Map widget
pub trait MapDisplay: Send + Sync {
    fn show(&self, view: &MapView);
}

/// Location line shown to the user
pub fn format_position(position: &Position) -> String {
    format!("Lat: {:.4}, Lon: {:.4}", position.latitude, position.longitude)
}

/// Ask for the position once and report it
///
/// `geolocation` is `None` when the host has no geolocation capability.
/// Failures are written to `text` and returned; they are never fatal.
pub async fn locate(
    geolocation: Option<&dyn Geolocation>,
    text: &dyn TextSink,
    map: &dyn MapDisplay,
    config: &MapConfig,
) -> Result<Position, GeoError> {
    let result = match geolocation {
        Some(geolocation) => geolocation.request_position().await,
        None => Err(GeoError::Unsupported),
    };

    match result {
        Ok(position) => {
            let shown = position.rounded();
            text.set_text(&format_position(&shown));
            map.show(&MapView::centered_on(shown, config));
            info!(latitude = shown.latitude, longitude = shown.longitude, "position located");
            Ok(position)
        }
        Err(e) => {
            warn!(error = %e, "geolocation failed");
            text.set_text(&e.to_string());
            Err(e)
        }
    }
}
