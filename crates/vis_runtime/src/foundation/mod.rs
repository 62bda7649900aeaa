//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and 2D geometry
//! - Logging utilities

pub mod math;
pub mod logging;
