// core/mod.rs

//! # Core Module
//!
//! Configuration handling: environment variable collection and the resolved,
//! immutable [`config::Config`] the plan pipeline runs from.

pub mod config;
pub mod env;
