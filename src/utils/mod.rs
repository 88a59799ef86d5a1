// utils/mod.rs

//! # Utilities Module
//!
//! Logging setup, terminal display helpers and the plan output sink.

pub mod display;
pub mod logging;
pub mod output;
