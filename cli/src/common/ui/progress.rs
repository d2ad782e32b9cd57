//! # Terminal Progress Bar (`common::ui::progress`)
//!
//! File: cli/src/common/ui/progress.rs
//!
//! Renders the orchestrator's progress stream (fractions in `[0.0, 1.0]`) as
//! an `indicatif` bar on stderr. The bar is drawn by its own tokio task that
//! drains an unbounded channel, so the archive work never waits on the
//! terminal.
//!
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// Bar length; fractions are scaled to this many steps.
pub const BAR_RESOLUTION: u64 = 1000;

/// Creates a progress bar labelled `label`, or a hidden one when `visible` is false.
pub fn new_bar(label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(BAR_RESOLUTION);
    bar.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{elapsed_precise}] {bar:40.cyan/blue} {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar.set_prefix(label.to_string());
    bar
}

/// Bar position for a progress fraction.
pub fn position_for(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * BAR_RESOLUTION as f64).round() as u64
}

/// Spawns the task that moves `bar` as values arrive. The task ends, clearing
/// the bar, once every sender has been dropped.
pub fn spawn_renderer(bar: ProgressBar) -> (UnboundedSender<f64>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<f64>();
    let handle = tokio::spawn(async move {
        while let Some(fraction) = rx.recv().await {
            bar.set_position(position_for(fraction));
        }
        bar.finish_and_clear();
    });
    (tx, handle)
}
