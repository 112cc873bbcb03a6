//! Session setup scenarios: model loading, camera, geolocation, map

use std::sync::Arc;
use std::time::Duration;

use emosense_core::{EmoSenseError, Emotion};
use emosense_runtime::{
    AppConfig, GeoError, Geolocation, LoopConfig, Position, Session, SessionContext, CAMERA_ALERT,
};
use emosense_test::{
    face_showing, CallLog, FakeCamera, FakeGeolocation, FakeModelLoader, RecordingMap,
    RecordingSink, ScriptedSource, StaticVideo,
};
use emosense_visual::RecordingSurface;

struct Host {
    log: CallLog,
    emotion: Arc<RecordingSink>,
    location: Arc<RecordingSink>,
    alerts: Arc<RecordingSink>,
    map: Arc<RecordingMap>,
    surface: RecordingSurface,
    source: Arc<ScriptedSource>,
}

impl Host {
    fn new() -> Self {
        Host {
            log: CallLog::new(),
            emotion: Arc::new(RecordingSink::new()),
            location: Arc::new(RecordingSink::new()),
            alerts: Arc::new(RecordingSink::new()),
            map: Arc::new(RecordingMap::new()),
            surface: RecordingSurface::new(),
            source: Arc::new(ScriptedSource::always(vec![face_showing(Emotion::Happy, 0.95)])),
        }
    }

    fn context(
        &self,
        models: FakeModelLoader,
        camera: FakeCamera,
        geolocation: Option<Arc<dyn Geolocation>>,
    ) -> SessionContext {
        SessionContext {
            models: Arc::new(models),
            camera: Arc::new(camera),
            geolocation,
            map: self.map.clone(),
            emotion_text: self.emotion.clone(),
            location_text: self.location.clone(),
            alerts: self.alerts.clone(),
            overlay: Box::new(self.surface.clone()),
        }
    }

    fn models(&self) -> FakeModelLoader {
        FakeModelLoader::new(self.source.clone(), self.log.clone())
    }

    fn camera(&self) -> FakeCamera {
        FakeCamera::granting(Arc::new(StaticVideo::new(640, 480)), self.log.clone())
    }

    fn geolocation(&self, result: Result<Position, GeoError>) -> Option<Arc<dyn Geolocation>> {
        Some(Arc::new(FakeGeolocation::new(result, self.log.clone())))
    }
}

#[tokio::test(start_paused = true)]
async fn test_launch_runs_everything() {
    let host = Host::new();
    let ctx = host.context(
        host.models(),
        host.camera(),
        host.geolocation(Ok(Position::new(51.507_351, -0.127_758))),
    );

    let mut session = Session::launch(ctx, &AppConfig::default()).await.unwrap();

    assert_eq!(
        session.wait_for_location().await,
        Some(Ok(Position::new(51.507_351, -0.127_758)))
    );
    assert_eq!(host.location.entries(), vec!["Lat: 51.5074, Lon: -0.1278".to_string()]);
    let views = host.map.views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].zoom, 13);
    assert_eq!(views[0].marker.popup, "You are here!");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(host.emotion.entries(), vec!["Laughing! 😄", "Laughing! 😄"]);
    assert_eq!(host.surface.rects().len(), 1);
    assert_eq!(session.stats().succeeded, 2);

    session.stop();
    assert!(!session.perception().is_running());
}

#[tokio::test(start_paused = true)]
async fn test_models_load_before_camera_and_detection() {
    let host = Host::new();
    let ctx = host.context(host.models(), host.camera(), None);

    let _session = Session::launch(ctx, &AppConfig::default()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let models = host.log.position("models").unwrap();
    let camera = host.log.position("camera").unwrap();
    assert!(models < camera);
    assert_eq!(host.source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_model_failure_aborts_before_camera() {
    let host = Host::new();
    let models = FakeModelLoader::failing(host.source.clone(), "missing weights", host.log.clone());
    let ctx = host.context(models, host.camera(), None);

    let result = Session::launch(ctx, &AppConfig::default()).await;

    assert!(matches!(result, Err(EmoSenseError::ModelLoad(_))));
    assert_eq!(host.log.position("camera"), None);
    assert_eq!(host.source.calls(), 0);
    assert!(host.alerts.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_camera_denied_alerts_once_and_still_locates() {
    let host = Host::new();
    let ctx = host.context(
        host.models(),
        FakeCamera::denying(host.log.clone()),
        host.geolocation(Ok(Position::new(1.0, 2.0))),
    );

    let result = Session::launch(ctx, &AppConfig::default()).await;

    assert!(matches!(result, Err(EmoSenseError::PermissionDenied)));
    assert_eq!(host.alerts.entries(), vec![CAMERA_ALERT.to_string()]);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(host.location.entries(), vec!["Lat: 1.0000, Lon: 2.0000".to_string()]);
    assert_eq!(host.source.calls(), 0);
    assert!(host.emotion.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_geolocation_failure_is_not_fatal() {
    let host = Host::new();
    let ctx = host.context(
        host.models(),
        host.camera(),
        host.geolocation(Err(GeoError::Timeout)),
    );

    let mut session = Session::launch(ctx, &AppConfig::default()).await.unwrap();

    assert_eq!(session.wait_for_location().await, Some(Err(GeoError::Timeout)));
    assert_eq!(
        host.location.entries(),
        vec!["The request to get user location timed out.".to_string()]
    );
    assert!(host.map.views().is_empty());
    assert!(session.perception().is_running());
}

#[tokio::test(start_paused = true)]
async fn test_missing_geolocation_capability() {
    let host = Host::new();
    let ctx = host.context(host.models(), host.camera(), None);

    let mut session = Session::launch(ctx, &AppConfig::default()).await.unwrap();

    assert_eq!(session.wait_for_location().await, Some(Err(GeoError::Unsupported)));
    assert_eq!(
        host.location.last().as_deref(),
        Some("Geolocation is not supported by this browser.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_geolocation_does_not_hold_up_the_loop() {
    let host = Host::new();
    let ctx = host.context(
        host.models(),
        host.camera(),
        Some(Arc::new(FakeGeolocation::silent(host.log.clone()))),
    );

    let session = tokio::time::timeout(
        Duration::from_secs(60),
        Session::launch(ctx, &AppConfig::default()),
    )
    .await
    .expect("launch waited on geolocation")
    .unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(host.source.calls(), 2);
    assert_eq!(host.emotion.count(), 2);
    assert_eq!(session.location(), None);
    assert!(host.location.entries().is_empty());
    assert!(host.map.views().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_geolocation_does_not_delay_camera_alert() {
    let host = Host::new();
    let ctx = host.context(
        host.models(),
        FakeCamera::denying(host.log.clone()),
        Some(Arc::new(FakeGeolocation::silent(host.log.clone()))),
    );

    let result = tokio::time::timeout(
        Duration::from_secs(60),
        Session::launch(ctx, &AppConfig::default()),
    )
    .await
    .expect("launch waited on geolocation");

    assert!(matches!(result, Err(EmoSenseError::PermissionDenied)));
    assert_eq!(host.alerts.entries(), vec![CAMERA_ALERT.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_launch_uses_configured_interval() {
    let host = Host::new();
    let ctx = host.context(host.models(), host.camera(), None);
    let config = AppConfig {
        perception: LoopConfig {
            tick_interval: Duration::from_millis(40),
            ..Default::default()
        },
        ..Default::default()
    };

    let session = Session::launch(ctx, &config).await.unwrap();
    tokio::time::sleep(Duration::from_millis(210)).await;

    assert_eq!(session.stats().ticks, 5);
}

#[tokio::test(start_paused = true)]
async fn test_launch_rejects_zero_interval() {
    let host = Host::new();
    let ctx = host.context(host.models(), host.camera(), None);
    let config = AppConfig {
        perception: LoopConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        },
        ..Default::default()
    };

    let result = Session::launch(ctx, &config).await;
    assert!(matches!(result, Err(EmoSenseError::Config(_))));
    assert_eq!(host.log.position("models"), None);
}
