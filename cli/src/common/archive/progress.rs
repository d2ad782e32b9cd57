//! # Pressure Progress Reporting (`common::archive::progress`)
//!
//! File: cli/src/common/archive/progress.rs
//!
//! ## Overview
//!
//! Archive operations report progress as a fraction in `[0.0, 1.0]` through a
//! caller-supplied callback. `ProgressReporter` sits between the operation and
//! that callback and guarantees the sequence the caller sees is well formed:
//! values are clamped to the unit interval and never go backwards, `start`
//! emits `0.0` and `finish` emits exactly `1.0`.
//!
//! The reporter holds no global state; each operation builds its own around
//! the callback it was given.
//!
use tracing::trace;

/// Share of the overall progress credited to the TAR stage of a composed
/// (tar + single-stream) pipeline. The stage is reported as one step.
pub const TAR_STAGE_SHARE: f64 = 0.5;

/// Monotonic wrapper around a progress callback.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn FnMut(f64),
    last: Option<f64>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: &'a mut dyn FnMut(f64)) -> Self {
        Self { sink, last: None }
    }

    /// Emits the initial `0.0`.
    pub fn start(&mut self) {
        self.emit(0.0);
    }

    /// Emits `done / total` after a unit of work (one file, one entry).
    pub fn units(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.emit(done as f64 / total as f64);
    }

    /// Emits a fixed milestone, such as the end of the TAR stage.
    pub fn stage(&mut self, fraction: f64) {
        self.emit(fraction);
    }

    /// Emits the terminal `1.0`.
    pub fn finish(&mut self) {
        self.emit(1.0);
    }

    fn emit(&mut self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        let value = match self.last {
            Some(last) if value < last => last,
            _ => value,
        };
        trace!("progress {:.3}", value);
        self.last = Some(value);
        (self.sink)(value);
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
