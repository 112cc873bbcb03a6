//! Session - one-shot setup around the perception loop

use std::sync::Arc;

use emosense_core::EmoResult;
use emosense_visual::OverlaySurface;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    locate, AlertSink, AppConfig, Camera, DisplaySink, GeoError, Geolocation, LoopStats,
    MapDisplay, ModelLoader, PerceptionLoop, Position, TextSink,
};

/// Alert shown when the camera cannot be opened
pub const CAMERA_ALERT: &str = "Could not access the camera. Please allow camera permissions.";

/// Host capabilities and page elements a session is wired to
pub struct SessionContext {
    pub models: Arc<dyn ModelLoader>,
    pub camera: Arc<dyn Camera>,
    /// `None` when the host has no geolocation
    pub geolocation: Option<Arc<dyn Geolocation>>,
    pub map: Arc<dyn MapDisplay>,
    pub emotion_text: Arc<dyn DisplaySink>,
    pub location_text: Arc<dyn TextSink>,
    pub alerts: Arc<dyn AlertSink>,
    pub overlay: Box<dyn OverlaySurface>,
}

/// A running application: the perception loop plus the one-shot locator
pub struct Session {
    perception: PerceptionLoop,
    location: Arc<Mutex<Option<Result<Position, GeoError>>>>,
    locator: Option<JoinHandle<()>>,
}

impl Session {
    /// Load models, then start locating the user in the background, open the
    /// camera and start the perception loop.
    ///
    /// Model or camera failures end the launch. A camera failure alerts the
    /// user once. Geolocation never holds up the camera or the loop; its
    /// failures are reported on the location line only.
    pub async fn launch(ctx: SessionContext, config: &AppConfig) -> EmoResult<Session> {
        config.perception.validate()?;

        info!(models = ?ctx.models.models(), "loading models");
        let source = ctx.models.load().await?;
        info!("models loaded");

        let location = Arc::new(Mutex::new(None));
        let locator = tokio::spawn({
            let geolocation = ctx.geolocation.clone();
            let text = Arc::clone(&ctx.location_text);
            let map = Arc::clone(&ctx.map);
            let map_config = config.map.clone();
            let location = Arc::clone(&location);
            async move {
                let result =
                    locate(geolocation.as_deref(), text.as_ref(), map.as_ref(), &map_config).await;
                *location.lock() = Some(result);
            }
        });

        let video = match ctx.camera.request_video_stream().await {
            Ok(video) => video,
            Err(e) => {
                error!(error = %e, "camera unavailable");
                ctx.alerts.alert(CAMERA_ALERT);
                return Err(e);
            }
        };

        let perception = PerceptionLoop::start(
            video,
            source,
            ctx.emotion_text,
            ctx.overlay,
            config.perception.clone(),
        )?;

        Ok(Session {
            perception,
            location,
            locator: Some(locator),
        })
    }

    pub fn perception(&self) -> &PerceptionLoop {
        &self.perception
    }

    /// Located position, `None` while the request is still pending
    pub fn location(&self) -> Option<Result<Position, GeoError>> {
        *self.location.lock()
    }

    /// Wait for the geolocation request to settle
    pub async fn wait_for_location(&mut self) -> Option<Result<Position, GeoError>> {
        if let Some(locator) = self.locator.take() {
            if let Err(e) = locator.await {
                warn!(error = %e, "geolocation task failed");
            }
        }
        self.location()
    }

    pub fn stats(&self) -> LoopStats {
        self.perception.stats()
    }

    pub fn stop(&mut self) {
        self.perception.stop();
    }
}
