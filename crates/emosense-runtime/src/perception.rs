//! Perception loop - fixed-cadence detect/resolve/render cycle

use std::sync::Arc;
use std::time::Duration;

use emosense_core::{
    resolve, DetectedFace, DisplaySize, EmoResult, EmoSenseError, EmotionLabel, TickId,
};
use emosense_visual::{overlay, OverlayStyle, OverlaySurface};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{DisplaySink, ExpressionSource, LoopConfig, VideoSource};

/// Detection slot state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    /// A detection call has been issued and has not settled yet
    InFlight,
}

/// What a single tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A detection call was issued for this tick
    Started(TickId),
    /// The previous detection was still in flight
    Skipped,
    /// The loop has been stopped
    Stopped,
}

#[derive(Clone, Debug, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub skipped: u64,
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub no_face: u64,
    /// Settlements that arrived after `stop()`
    pub discarded: u64,
    pub last_latency: Duration,
}

struct LoopInner {
    state: LoopState,
    stopped: bool,
    next_tick: TickId,
    surface: Box<dyn OverlaySurface>,
    stats: LoopStats,
}

struct Shared {
    inner: Mutex<LoopInner>,
    video: Arc<dyn VideoSource>,
    source: Arc<dyn ExpressionSource>,
    sink: Arc<dyn DisplaySink>,
    runtime: Handle,
    display_size: DisplaySize,
    style: OverlayStyle,
}

impl Shared {
    fn tick(self: &Arc<Self>) -> TickOutcome {
        let tick = {
            let mut inner = self.inner.lock();
            if inner.stopped {
                return TickOutcome::Stopped;
            }
            inner.stats.ticks += 1;

            if inner.state == LoopState::InFlight {
                inner.stats.skipped += 1;
                debug!("detection in flight, skipping tick");
                return TickOutcome::Skipped;
            }

            inner.state = LoopState::InFlight;
            inner.stats.started += 1;
            let tick = inner.next_tick;
            inner.next_tick = tick.next();
            tick
        };

        let frame = self.video.current_frame();
        debug!(%tick, frame = frame.index, "requesting detections");

        let shared = Arc::clone(self);
        let source = Arc::clone(&self.source);
        let source_size = frame.size();
        self.runtime.spawn(async move {
            let started = Instant::now();
            // a panicking detector must still release the slot
            let detection = shared
                .runtime
                .spawn(async move { source.detect(&frame).await });
            let result = match detection.await {
                Ok(result) => result,
                Err(e) => Err(EmoSenseError::DetectionFailure(format!(
                    "detection task failed: {e}"
                ))),
            };
            shared.settle(tick, source_size, result, started.elapsed());
        });

        TickOutcome::Started(tick)
    }

    /// Apply a detection result. Runs under the loop lock so that `stop()`
    /// cannot interleave with a publish.
    fn settle(
        &self,
        tick: TickId,
        source_size: DisplaySize,
        result: EmoResult<Vec<DetectedFace>>,
        latency: Duration,
    ) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.state = LoopState::Idle;

        if inner.stopped {
            inner.stats.discarded += 1;
            debug!(%tick, "loop stopped, discarding detection result");
            return;
        }
        inner.stats.last_latency = latency;

        let faces = match result {
            Ok(faces) => faces,
            Err(e) => {
                inner.stats.failed += 1;
                warn!(%tick, error = %e, "detection failed");
                return;
            }
        };

        let Some(first) = faces.first() else {
            inner.stats.succeeded += 1;
            inner.stats.no_face += 1;
            self.sink.publish(&EmotionLabel::no_face());
            overlay::clear(inner.surface.as_mut());
            return;
        };

        match resolve(&first.expressions) {
            Ok(label) => {
                inner.stats.succeeded += 1;
                debug!(%tick, faces = faces.len(), %label, "resolved");
                self.sink.publish(&label);
                overlay::render(
                    inner.surface.as_mut(),
                    &faces,
                    source_size,
                    self.display_size,
                    &self.style,
                );
            }
            Err(e) => {
                inner.stats.failed += 1;
                warn!(%tick, error = %e, "malformed detection result");
            }
        }
    }
}

/// Runs detection on a fixed cadence with at most one call in flight
pub struct PerceptionLoop {
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
}

impl PerceptionLoop {
    /// Start ticking on the current tokio runtime
    ///
    /// The video must be playing with non-zero dimensions. The overlay is
    /// resized to the video once here and keeps that size for the loop's
    /// lifetime.
    pub fn start(
        video: Arc<dyn VideoSource>,
        source: Arc<dyn ExpressionSource>,
        sink: Arc<dyn DisplaySink>,
        mut surface: Box<dyn OverlaySurface>,
        config: LoopConfig,
    ) -> EmoResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| {
            EmoSenseError::Config("perception loop requires a tokio runtime".to_string())
        })?;

        let (width, height) = video.dimensions();
        let display_size = DisplaySize::new(width, height)?;
        surface.resize(display_size);

        let shared = Arc::new(Shared {
            inner: Mutex::new(LoopInner {
                state: LoopState::Idle,
                stopped: false,
                next_tick: TickId::ZERO,
                surface,
                stats: LoopStats::default(),
            }),
            video,
            source,
            sink,
            runtime: runtime.clone(),
            display_size,
            style: config.overlay,
        });

        let period = config.tick_interval;
        let first_tick = Instant::now() + period;
        let ticker_shared = Arc::clone(&shared);
        let ticker = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if ticker_shared.tick() == TickOutcome::Stopped {
                    break;
                }
            }
        });

        info!(
            width = display_size.width,
            height = display_size.height,
            interval_ms = period.as_millis() as u64,
            "perception loop started"
        );

        Ok(PerceptionLoop {
            shared,
            ticker: Some(ticker),
        })
    }

    /// Run one tick immediately, independent of the timer
    pub fn tick_now(&self) -> TickOutcome {
        self.shared.tick()
    }

    /// Stop ticking. A detection that settles afterwards has no effect.
    pub fn stop(&mut self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.stopped {
                return;
            }
            inner.stopped = true;
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        info!("perception loop stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.shared.inner.lock().stopped
    }

    pub fn state(&self) -> LoopState {
        self.shared.inner.lock().state
    }

    pub fn stats(&self) -> LoopStats {
        self.shared.inner.lock().stats.clone()
    }

    pub fn display_size(&self) -> DisplaySize {
        self.shared.display_size
    }
}

impl Drop for PerceptionLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
