//! Frame scheduling: time sources, pacing, and cancellation.
//!
//! The scheduler is indifferent to program identity; each tick draws with
//! whatever program the engine currently has active. Hosts with their own
//! callback pump (a winit event loop) drive pacing through
//! [`FrameScheduler::ready_for_frame`] and [`FrameScheduler::next_deadline`];
//! hosts without one call [`FrameScheduler::run`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::GlContext;
use crate::state::Engine;

/// Timestamp handed to a render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Milliseconds since the source was created or last reset.
    pub millis: f64,
    pub frame_index: u64,
}

/// Monotonic, non-decreasing frame timestamps.
pub trait TimeSource {
    fn sample(&mut self) -> TimeSample;
    fn reset(&mut self);
}

/// Wall-clock source for live rendering.
pub struct SystemTimeSource {
    origin: Instant,
    frame_index: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            frame_index: 0,
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            millis: self.origin.elapsed().as_secs_f64() * 1000.0,
            frame_index: self.frame_index,
        };
        self.frame_index += 1;
        sample
    }

    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame_index = 0;
    }
}

/// Deterministic source: starts at zero and advances a fixed step per
/// sample. Used by tests and offline rendering.
pub struct FixedStepTimeSource {
    step_millis: f64,
    next_millis: f64,
    frame_index: u64,
}

impl FixedStepTimeSource {
    pub fn new(step_millis: f64) -> Self {
        Self {
            step_millis,
            next_millis: 0.0,
            frame_index: 0,
        }
    }
}

impl TimeSource for FixedStepTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            millis: self.next_millis,
            frame_index: self.frame_index,
        };
        self.next_millis += self.step_millis;
        self.frame_index += 1;
        sample
    }

    fn reset(&mut self) {
        self.next_millis = 0.0;
        self.frame_index = 0;
    }
}

/// Clonable stop flag shared between the render loop and whoever owns
/// shutdown. Checked at the top of every loop iteration; a tick that already
/// started completes its draw.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Paces render ticks and owns the loop's cancellation token.
pub struct FrameScheduler {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
    token: CancellationToken,
}

impl FrameScheduler {
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            interval,
            next_deadline: None,
            token: CancellationToken::new(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether a new tick may start at `now`. Always false once cancelled.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        match self.next_deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.next_deadline = self.interval.map(|interval| now + interval);
    }

    pub fn reset(&mut self) {
        self.next_deadline = None;
    }

    /// Blocking loop for hosts without their own callback pump. Each
    /// iteration checks the token, samples time, runs one tick, then lets
    /// `present` swap buffers (or cancel). An uncapped scheduler ticks as
    /// fast as `present` returns.
    pub fn run<C, F>(&mut self, engine: &mut Engine<C>, time: &mut dyn TimeSource, mut present: F)
    where
        C: GlContext,
        F: FnMut(&mut Engine<C>, TimeSample),
    {
        loop {
            if self.token.is_cancelled() {
                break;
            }
            let now = Instant::now();
            if !self.ready_for_frame(now) {
                if let Some(deadline) = self.next_deadline {
                    std::thread::sleep(deadline.saturating_duration_since(now));
                }
                continue;
            }
            let sample = time.sample();
            engine.render_tick(sample);
            present(engine, sample);
            self.mark_rendered(Instant::now());
        }
    }
}
