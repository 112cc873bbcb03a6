//! Chaos testing for the perception loop
//!
//! Wraps an expression source and makes it misbehave:
//! - Latency with jitter
//! - Failed detection calls
//! - Faces that momentarily disappear

use std::time::Duration;

use async_trait::async_trait;
use emosense_core::{DetectedFace, EmoResult, EmoSenseError, VideoFrame};
use emosense_runtime::ExpressionSource;
use parking_lot::Mutex;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Jitter distribution type
#[derive(Clone, Debug)]
pub enum JitterDistribution {
    /// No jitter
    None,
    /// Uniform distribution
    Uniform { min_ms: u32, max_ms: u32 },
    /// Pareto distribution (heavy tail)
    Pareto { scale_ms: f64, shape: f64 },
}

impl JitterDistribution {
    /// Sample a jitter value
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        match self {
            JitterDistribution::None => Duration::ZERO,
            JitterDistribution::Uniform { min_ms, max_ms } => {
                if max_ms <= min_ms {
                    return Duration::from_millis(*min_ms as u64);
                }
                let dist = Uniform::new(*min_ms, *max_ms);
                Duration::from_millis(dist.sample(rng) as u64)
            }
            JitterDistribution::Pareto { scale_ms, shape } => {
                let u: f64 = rng.gen_range(f64::EPSILON..1.0);
                let value = scale_ms / u.powf(1.0 / shape);
                Duration::from_millis(value.min(2000.0) as u64) // Cap at 2 seconds
            }
        }
    }
}

/// Detector chaos configuration
#[derive(Clone, Debug)]
pub struct ChaosConfig {
    /// Base detection latency
    pub base_latency: Duration,
    /// Jitter distribution
    pub jitter: JitterDistribution,
    /// Failed call rate (0.0 - 1.0)
    pub failure_rate: f64,
    /// Rate of calls that lose every face (0.0 - 1.0)
    pub dropout_rate: f64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        ChaosConfig {
            base_latency: Duration::from_millis(40),
            jitter: JitterDistribution::Uniform {
                min_ms: 0,
                max_ms: 40,
            },
            failure_rate: 0.02,
            dropout_rate: 0.05,
        }
    }
}

impl ChaosConfig {
    /// Fast, reliable detector
    pub fn calm() -> Self {
        ChaosConfig {
            base_latency: Duration::from_millis(20),
            jitter: JitterDistribution::None,
            failure_rate: 0.0,
            dropout_rate: 0.0,
        }
    }

    /// Detector regularly slower than the tick interval
    pub fn sluggish() -> Self {
        ChaosConfig {
            base_latency: Duration::from_millis(120),
            jitter: JitterDistribution::Pareto {
                scale_ms: 30.0,
                shape: 1.5,
            },
            failure_rate: 0.05,
            dropout_rate: 0.1,
        }
    }

    /// Slow and unreliable
    pub fn hostile() -> Self {
        ChaosConfig {
            base_latency: Duration::from_millis(250),
            jitter: JitterDistribution::Pareto {
                scale_ms: 100.0,
                shape: 1.2,
            },
            failure_rate: 0.3,
            dropout_rate: 0.2,
        }
    }
}

/// Chaos statistics
#[derive(Clone, Debug, Default)]
pub struct ChaosStats {
    pub calls: u64,
    pub failures: u64,
    pub dropouts: u64,
    pub total_latency_ms: u64,
    pub max_latency_ms: u64,
}

impl ChaosStats {
    pub fn avg_latency_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.calls as f64
        }
    }
}

enum Fate {
    Fail,
    Dropout,
    Pass,
}

struct ChaosState {
    rng: StdRng,
    stats: ChaosStats,
}

/// Expression source that delays, fails or empties an inner source's results
pub struct ChaosSource<S> {
    inner: S,
    config: ChaosConfig,
    state: Mutex<ChaosState>,
}

impl<S: ExpressionSource> ChaosSource<S> {
    pub fn new(inner: S, config: ChaosConfig) -> Self {
        Self::with_seed(inner, config, rand::random())
    }

    /// Deterministic chaos for reproducible tests
    pub fn with_seed(inner: S, config: ChaosConfig, seed: u64) -> Self {
        ChaosSource {
            inner,
            config,
            state: Mutex::new(ChaosState {
                rng: StdRng::seed_from_u64(seed),
                stats: ChaosStats::default(),
            }),
        }
    }

    pub fn stats(&self) -> ChaosStats {
        self.state.lock().stats.clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn roll(&self) -> (Duration, Fate) {
        let mut state = self.state.lock();
        let latency = self.config.base_latency + self.config.jitter.sample(&mut state.rng);
        let dice: f64 = state.rng.gen();

        let fate = if dice < self.config.failure_rate {
            Fate::Fail
        } else if dice < self.config.failure_rate + self.config.dropout_rate {
            Fate::Dropout
        } else {
            Fate::Pass
        };

        let latency_ms = latency.as_millis() as u64;
        state.stats.calls += 1;
        state.stats.total_latency_ms += latency_ms;
        state.stats.max_latency_ms = state.stats.max_latency_ms.max(latency_ms);
        match fate {
            Fate::Fail => state.stats.failures += 1,
            Fate::Dropout => state.stats.dropouts += 1,
            Fate::Pass => {}
        }

        (latency, fate)
    }
}

#[async_trait]
impl<S: ExpressionSource> ExpressionSource for ChaosSource<S> {
    async fn detect(&self, frame: &VideoFrame) -> EmoResult<Vec<DetectedFace>> {
        let (latency, fate) = self.roll();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match fate {
            Fate::Fail => Err(EmoSenseError::DetectionFailure(
                "injected detector failure".to_string(),
            )),
            Fate::Dropout => Ok(Vec::new()),
            Fate::Pass => self.inner.detect(frame).await,
        }
    }
}
