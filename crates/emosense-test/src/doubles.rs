//! Test doubles for the perception loop and its host
//!
//! Every double is cheap to share through `Arc` and records what was done to
//! it, so scenarios can assert on calls after the fact.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use emosense_core::{DetectedFace, DisplaySize, EmoResult, EmoSenseError, EmotionLabel, VideoFrame};
use emosense_runtime::{
    AlertSink, Camera, DisplaySink, ExpressionSource, GeoError, Geolocation, MapDisplay, MapView,
    ModelLoader, Position, TextSink, VideoSource,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Shared, ordered record of calls across several doubles
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: &str) {
        self.0.lock().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Position of the first `call`, if it happened
    pub fn position(&self, call: &str) -> Option<usize> {
        self.0.lock().iter().position(|c| c == call)
    }
}

// ============================================================================
// VIDEO
// ============================================================================

/// Video that never changes; every frame is blank
pub struct StaticVideo {
    display: (u32, u32),
    native: DisplaySize,
    frames: AtomicU64,
}

impl StaticVideo {
    /// Display and detector share the same resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self::scaled(width, height, width.max(1), height.max(1))
    }

    /// Detector runs at `native_width` x `native_height`
    pub fn scaled(width: u32, height: u32, native_width: u32, native_height: u32) -> Self {
        StaticVideo {
            display: (width, height),
            native: DisplaySize {
                width: native_width,
                height: native_height,
            },
            frames: AtomicU64::new(0),
        }
    }

    /// Frames handed out so far
    pub fn frames_read(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }
}

impl VideoSource for StaticVideo {
    fn dimensions(&self) -> (u32, u32) {
        self.display
    }

    fn current_frame(&self) -> VideoFrame {
        let index = self.frames.fetch_add(1, Ordering::SeqCst);
        VideoFrame::blank(index, self.native)
    }
}

// ============================================================================
// EXPRESSION SOURCES
// ============================================================================

type Detections = EmoResult<Vec<DetectedFace>>;

/// Replays a script of results, then repeats a fallback
pub struct ScriptedSource {
    script: Mutex<VecDeque<Detections>>,
    fallback: Detections,
    frames: Mutex<Vec<u64>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Detections>) -> Self {
        Self::with_fallback(script, Ok(Vec::new()))
    }

    pub fn with_fallback(script: Vec<Detections>, fallback: Detections) -> Self {
        ScriptedSource {
            script: Mutex::new(script.into()),
            fallback,
            frames: Mutex::new(Vec::new()),
        }
    }

    /// Always returns the same faces
    pub fn always(faces: Vec<DetectedFace>) -> Self {
        Self::with_fallback(Vec::new(), Ok(faces))
    }

    pub fn calls(&self) -> usize {
        self.frames.lock().len()
    }

    /// Frame indices passed to `detect`, in call order
    pub fn frames(&self) -> Vec<u64> {
        self.frames.lock().clone()
    }
}

#[async_trait]
impl ExpressionSource for ScriptedSource {
    async fn detect(&self, frame: &VideoFrame) -> EmoResult<Vec<DetectedFace>> {
        self.frames.lock().push(frame.index);
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Releases results into a [`GatedSource`]
#[derive(Clone)]
pub struct Gate {
    tx: mpsc::UnboundedSender<Detections>,
}

impl Gate {
    /// Settle the oldest waiting (or next) detection call
    pub fn release(&self, result: Detections) {
        // the receiver lives as long as the source; a send error means the
        // source is gone and nobody is waiting
        let _ = self.tx.send(result);
    }

    pub fn release_faces(&self, faces: Vec<DetectedFace>) {
        self.release(Ok(faces));
    }

    pub fn fail(&self, message: &str) {
        self.release(Err(EmoSenseError::DetectionFailure(message.to_string())));
    }
}

/// Every call blocks until the test releases a result through its [`Gate`]
pub struct GatedSource {
    calls: AtomicUsize,
    settled: AtomicUsize,
    results: tokio::sync::Mutex<mpsc::UnboundedReceiver<Detections>>,
}

impl GatedSource {
    pub fn new() -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = GatedSource {
            calls: AtomicUsize::new(0),
            settled: AtomicUsize::new(0),
            results: tokio::sync::Mutex::new(rx),
        };
        (Arc::new(source), Gate { tx })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that have been started but not answered
    pub fn pending(&self) -> usize {
        self.calls() - self.settled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExpressionSource for GatedSource {
    async fn detect(&self, _frame: &VideoFrame) -> EmoResult<Vec<DetectedFace>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.results.lock().await.recv().await;
        self.settled.fetch_add(1, Ordering::SeqCst);
        result.unwrap_or_else(|| Err(EmoSenseError::DetectionFailure("gate closed".to_string())))
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Records everything written to it; usable as any text-like sink
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.entries.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    fn push(&self, text: &str) {
        self.entries.lock().push(text.to_string());
    }
}

impl DisplaySink for RecordingSink {
    fn publish(&self, label: &EmotionLabel) {
        self.push(label.as_str());
    }
}

impl TextSink for RecordingSink {
    fn set_text(&self, text: &str) {
        self.push(text);
    }
}

impl AlertSink for RecordingSink {
    fn alert(&self, message: &str) {
        self.push(message);
    }
}

/// Map widget that remembers every view shown
#[derive(Default)]
pub struct RecordingMap {
    views: Mutex<Vec<MapView>>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<MapView> {
        self.views.lock().clone()
    }
}

impl MapDisplay for RecordingMap {
    fn show(&self, view: &MapView) {
        self.views.lock().push(view.clone());
    }
}

// ============================================================================
// HOST CAPABILITIES
// ============================================================================

/// Camera that grants or denies access
pub struct FakeCamera {
    result: EmoResult<Arc<dyn VideoSource>>,
    log: CallLog,
}

impl FakeCamera {
    pub fn granting(video: Arc<dyn VideoSource>, log: CallLog) -> Self {
        FakeCamera {
            result: Ok(video),
            log,
        }
    }

    pub fn denying(log: CallLog) -> Self {
        FakeCamera {
            result: Err(EmoSenseError::PermissionDenied),
            log,
        }
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn request_video_stream(&self) -> EmoResult<Arc<dyn VideoSource>> {
        self.log.record("camera");
        self.result.clone()
    }
}

/// Geolocation answering with a fixed result, or never answering
pub struct FakeGeolocation {
    result: Option<Result<Position, GeoError>>,
    log: CallLog,
}

impl FakeGeolocation {
    pub fn new(result: Result<Position, GeoError>, log: CallLog) -> Self {
        FakeGeolocation {
            result: Some(result),
            log,
        }
    }

    /// A permission prompt the user never answers
    pub fn silent(log: CallLog) -> Self {
        FakeGeolocation { result: None, log }
    }
}

#[async_trait]
impl Geolocation for FakeGeolocation {
    async fn request_position(&self) -> Result<Position, GeoError> {
        self.log.record("geolocation");
        match self.result {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

/// Model loader handing out a prepared source
pub struct FakeModelLoader {
    source: Arc<dyn ExpressionSource>,
    failure: Option<String>,
    log: CallLog,
}

impl FakeModelLoader {
    pub fn new(source: Arc<dyn ExpressionSource>, log: CallLog) -> Self {
        FakeModelLoader {
            source,
            failure: None,
            log,
        }
    }

    pub fn failing(source: Arc<dyn ExpressionSource>, message: &str, log: CallLog) -> Self {
        FakeModelLoader {
            source,
            failure: Some(message.to_string()),
            log,
        }
    }
}

#[async_trait]
impl ModelLoader for FakeModelLoader {
    async fn load(&self) -> EmoResult<Arc<dyn ExpressionSource>> {
        self.log.record("models");
        match &self.failure {
            Some(message) => Err(EmoSenseError::ModelLoad(message.clone())),
            None => Ok(Arc::clone(&self.source)),
        }
    }
}
