//! # Pressure UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal presentation helpers for the commands. Everything here writes to
//! stderr so stdout stays free for the commands' own output.
//!
//! - **`progress`**: `indicatif` progress bar fed by the orchestrator's
//!   progress channel.
//!
pub mod progress;
