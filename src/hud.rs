//! HUD text
//!
//! Formats what the overlay shows. The binary writes these strings into the DOM;
//! keeping the formatting here lets it be tested without a browser.

use crate::sim::progress::{CompletionReport, SessionPhase};
use crate::sim::state::GameState;

/// Frames averaged by the FPS counter
const FPS_WINDOW: usize = 60;
/// Minimum time between published FPS values (ms)
const FPS_PUBLISH_INTERVAL: f64 = 1000.0;

/// Rolling frame-rate estimate from frame timestamps (ms), published once per second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    last_publish: f64,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            last_publish: 0.0,
            fps: 0,
        }
    }

    /// Record a frame at `time_ms` and return the displayed value
    pub fn record(&mut self, time_ms: f64) -> u32 {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        if time_ms - self.last_publish < FPS_PUBLISH_INTERVAL {
            return self.fps;
        }

        // Oldest sample sits where the next write goes
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
                self.last_publish = time_ms;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Everything the overlay displays for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub speed: String,
    pub gems: String,
    pub time: String,
    pub fps: Option<String>,
    /// Boost meter fill, 0-100
    pub boost_percent: u32,
    pub boosting: bool,
    /// Finish banner, once the level is complete
    pub banner: Option<String>,
}

impl HudView {
    pub fn from_state(state: &GameState, fps: Option<u32>) -> Self {
        let collected = state.gems_collected();
        let total = state.progress.initial_gem_count();
        let banner = match state.phase() {
            SessionPhase::Completed => state.progress.completion().map(format_completion),
            _ => None,
        };

        Self {
            speed: format_speed(state.body.velocity.length()),
            gems: format_gems(collected, total),
            time: format_time(state.elapsed()),
            fps: fps.map(|f| format!("FPS: {f}")),
            boost_percent: (state.boost.fraction(&state.tuning) * 100.0).round() as u32,
            boosting: state.boost.boosting,
            banner,
        }
    }
}

pub fn format_speed(speed: f32) -> String {
    let speed = if speed.is_finite() { speed } else { 0.0 };
    format!("Speed: {speed:.2}")
}

pub fn format_gems(collected: usize, total: usize) -> String {
    format!("Gems: {collected}/{total}")
}

/// Whole seconds as `m:ss`
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn format_time(seconds: f64) -> String {
    format!("Time: {}", format_clock(seconds))
}

pub fn format_completion(report: &CompletionReport) -> String {
    let mut text = format!(
        "Finished in {} with {} gems",
        format_clock(report.completion_time),
        report.gems_collected
    );
    if report.perfect_score {
        text.push_str(" - perfect!");
    }
    text
}
