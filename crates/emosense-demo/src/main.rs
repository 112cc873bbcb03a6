//! EmoSense Demo Application
//!
//! Runs a full session headless:
//! - Synthetic detector behind a chaotic latency/failure layer
//! - Label changes printed as they happen
//! - Location line and map view printed once
//! - Loop statistics on exit
//!
//! Usage: emosense-demo [--config <file.json>] [--seconds <n>] [--log pretty|json]

use std::sync::Arc;
use std::time::Duration;

use emosense_core::{DisplaySize, EmotionLabel, Point, Rect};
use emosense_runtime::{
    init_logging, AlertSink, AppConfig, DisplaySink, LogFormat, LoopStats, MapDisplay, MapView,
    Position, Session, SessionContext, TextSink,
};
use emosense_test::{
    CallLog, ChaosConfig, ChaosSource, FakeCamera, FakeGeolocation, FakeModelLoader,
    StaticVideo, SyntheticSource,
};
use emosense_visual::{Color, OverlaySurface};
use parking_lot::Mutex;
use tracing::info;

struct Options {
    config: Option<String>,
    seconds: u64,
    log: LogFormat,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        config: None,
        seconds: 10,
        log: LogFormat::Pretty,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or(format!("{flag} needs a value"));
        match arg.as_str() {
            "--config" => options.config = Some(value("--config")?),
            "--seconds" => {
                options.seconds = value("--seconds")?
                    .parse()
                    .map_err(|e| format!("--seconds: {e}"))?
            }
            "--log" => options.log = LogFormat::parse(&value("--log")?).map_err(|e| e.to_string())?,
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(options)
}

/// Prints the emotion label whenever it changes
#[derive(Default)]
struct LabelPrinter {
    last: Mutex<Option<String>>,
}

impl DisplaySink for LabelPrinter {
    fn publish(&self, label: &EmotionLabel) {
        let mut last = self.last.lock();
        if last.as_deref() != Some(label.as_str()) {
            println!("  emotion  > {}", label);
            *last = Some(label.to_string());
        }
    }
}

struct Console;

impl TextSink for Console {
    fn set_text(&self, text: &str) {
        println!("  location > {}", text);
    }
}

impl AlertSink for Console {
    fn alert(&self, message: &str) {
        eprintln!("  ALERT    > {}", message);
    }
}

impl MapDisplay for Console {
    fn show(&self, view: &MapView) {
        println!(
            "  map      > ({:.4}, {:.4}) zoom {} [{}]",
            view.center.latitude, view.center.longitude, view.zoom, view.marker.popup
        );
    }
}

#[derive(Default)]
struct FrameCounts {
    frames: u64,
    boxes: usize,
    captions: usize,
}

/// Overlay that keeps only what the current frame shows
#[derive(Clone, Default)]
struct FrameSurface {
    size: Option<DisplaySize>,
    counts: Arc<Mutex<FrameCounts>>,
}

impl OverlaySurface for FrameSurface {
    fn resize(&mut self, size: DisplaySize) {
        self.size = Some(size);
    }

    fn size(&self) -> Option<DisplaySize> {
        self.size
    }

    fn clear(&mut self) {
        let mut counts = self.counts.lock();
        counts.frames += 1;
        counts.boxes = 0;
        counts.captions = 0;
    }

    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f32) {
        self.counts.lock().boxes += 1;
    }

    fn fill_text(&mut self, _text: &str, _at: Point, _color: Color) {
        self.counts.lock().captions += 1;
    }

    fn fill_point(&mut self, _at: Point, _radius: f32, _color: Color) {}
}

fn print_stats(stats: &LoopStats) {
    println!();
    println!("Loop statistics:");
    println!("  ticks:        {}", stats.ticks);
    println!("  started:      {}", stats.started);
    println!("  skipped:      {}", stats.skipped);
    println!("  succeeded:    {}", stats.succeeded);
    println!("  no face:      {}", stats.no_face);
    println!("  failed:       {}", stats.failed);
    println!("  last latency: {:?}", stats.last_latency);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;
    init_logging(options.log)?;

    let config = match &options.config {
        Some(path) => AppConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => AppConfig::default(),
    };

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           EmoSense Demo - Headless Perception              ║");
    println!("║     Synthetic faces, chaotic detector, live labels         ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "Ticking every {:?} for {} seconds...",
        config.perception.tick_interval, options.seconds
    );
    println!();

    let log = CallLog::new();
    let detector = ChaosSource::new(SyntheticSource::tour(12), ChaosConfig::sluggish());
    let console = Arc::new(Console);
    let overlay = FrameSurface::default();

    let ctx = SessionContext {
        models: Arc::new(FakeModelLoader::new(Arc::new(detector), log.clone())),
        camera: Arc::new(FakeCamera::granting(
            Arc::new(StaticVideo::new(640, 480)),
            log.clone(),
        )),
        geolocation: Some(Arc::new(FakeGeolocation::new(
            Ok(Position::new(52.520_008, 13.404_954)),
            log.clone(),
        ))),
        map: console.clone(),
        emotion_text: Arc::new(LabelPrinter::default()),
        location_text: console.clone(),
        alerts: console,
        overlay: Box::new(overlay.clone()),
    };

    let mut session = Session::launch(ctx, &config).await?;
    info!(calls = ?log.calls(), "session started");

    tokio::time::sleep(Duration::from_secs(options.seconds)).await;
    session.stop();

    print_stats(&session.stats());
    let counts = overlay.counts.lock();
    println!(
        "  overlay:      {} frames, last showed {} boxes and {} captions",
        counts.frames, counts.boxes, counts.captions
    );
    println!();
    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emosense_core::Emotion;
    use emosense_test::face_showing;
    use emosense_visual::{render, OverlayStyle};

    #[test]
    fn test_frame_surface_keeps_only_current_frame() {
        let mut surface = FrameSurface::default();
        let size = DisplaySize::new(640, 480).unwrap();
        let faces = vec![
            face_showing(Emotion::Happy, 0.7),
            face_showing(Emotion::Sad, 0.6),
        ];

        for _ in 0..1000 {
            render(&mut surface, &faces, size, size, &OverlayStyle::default());
        }

        let counts = surface.counts.lock();
        assert_eq!(counts.frames, 1000);
        assert_eq!(counts.boxes, 2);
        assert!(counts.captions >= 2);
    }
}
