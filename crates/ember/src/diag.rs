//! Diagnostics: logger setup, per-frame render statistics, FPS sampling.
//!
//! Enabled by the `diagnostics` feature flag. The frame loop keeps a
//! [`RenderStats`] resource current after every flush and drives an
//! [`FpsCounter`] that reports once per second (log line plus, optionally,
//! the window title).

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::render2d::FlushStats;

// ── Logger ──────────────────────────────────────────────────────────────

/// Counts of warnings and errors logged since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub warnings: u64,
    pub errors: u64,
}

static LOG_COUNTS: Mutex<LogCounts> = Mutex::new(LogCounts {
    warnings: 0,
    errors: 0,
});

/// A logger that delegates to env_logger for stderr output and tallies
/// warnings and errors for the per-second summary.
struct DiagLogger {
    inner: env_logger::Logger,
}

impl log::Log for DiagLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata) || metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            self.inner.log(record);
        }

        if let Ok(mut counts) = LOG_COUNTS.lock() {
            match record.level() {
                log::Level::Warn => counts.warnings += 1,
                log::Level::Error => counts.errors += 1,
                _ => {}
            }
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static DIAG_LOGGER: std::sync::OnceLock<DiagLogger> = std::sync::OnceLock::new();

/// Initialize logging. Reads `RUST_LOG`; the effective level is at least
/// `Info`.
///
/// Call this early (before any log messages). Calling it twice, or after
/// another logger was installed, leaves the existing logger in place.
pub fn init_logger() {
    let inner = env_logger::Builder::new().parse_default_env().build();
    let max_level = inner.filter();

    let logger = DIAG_LOGGER.get_or_init(|| DiagLogger { inner });

    if log::set_logger(logger).is_err() {
        eprintln!("[ember] Warning: a logger is already set.");
        return;
    }
    log::set_max_level(max_level.max(log::LevelFilter::Info));
}

/// Warnings and errors logged so far through [`init_logger`]'s logger.
pub fn log_counts() -> LogCounts {
    LOG_COUNTS.lock().map(|c| *c).unwrap_or_default()
}

// ── RenderStats ─────────────────────────────────────────────────────────

/// Render statistics from the most recent frame. Stored as a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: u32,
    pub quads: u32,
    pub vertices: u32,
    pub textures_loaded: u32,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the counters with one flush's results.
    pub fn record(&mut self, flush: FlushStats, textures_loaded: usize) {
        self.draw_calls = flush.submissions as u32;
        self.quads = flush.quads as u32;
        self.vertices = (flush.quads * crate::render2d::vertex::VERTICES_PER_QUAD) as u32;
        self.textures_loaded = textures_loaded as u32;
    }
}

// ── FpsCounter ──────────────────────────────────────────────────────────

/// Counts frames and reports the average rate once per sampling window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    last_fps: f32,
}

impl FpsCounter {
    /// A counter that reports every second.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1), Instant::now())
    }

    pub fn with_window(window: Duration, start: Instant) -> Self {
        Self {
            window,
            window_start: start,
            frames: 0,
            last_fps: 0.0,
        }
    }

    /// Count a frame finished at `now`. Returns the rate when a sampling
    /// window has just closed.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }
        self.last_fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.last_fps)
    }

    /// The rate from the last closed window.
    pub fn fps(&self) -> f32 {
        self.last_fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// `"<title> | <fps> FPS"`, as shown in the window title.
pub fn title_with_fps(title: &str, fps: f32) -> String {
    format!("{title} | {fps:.0} FPS")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_reports_once_per_window() {
        let start = Instant::now();
        let mut counter = FpsCounter::with_window(Duration::from_secs(1), start);
        for i in 1..60 {
            let now = start + Duration::from_millis(i * 16);
            assert_eq!(counter.tick(now), None);
        }
        let fps = counter.tick(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-3);
        assert_eq!(counter.fps(), fps);
        // A fresh window starts counting from zero.
        assert_eq!(counter.tick(start + Duration::from_millis(1100)), None);
    }

    #[test]
    fn render_stats_follow_flush_counts() {
        let mut stats = RenderStats::new();
        stats.record(
            FlushStats {
                submissions: 2,
                quads: 600,
            },
            3,
        );
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.vertices, 2400);
        assert_eq!(stats.textures_loaded, 3);
    }

    #[test]
    fn title_format() {
        assert_eq!(title_with_fps("Asteroids", 143.6), "Asteroids | 144 FPS");
    }
}
