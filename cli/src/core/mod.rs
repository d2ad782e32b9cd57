//! # Pressure Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that every
//! command relies on: configuration and error management.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{PressError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
