//! vigil-cli
//!
//! Runs pipeline stages from JSON files. Configuration loading and report
//! rendering live here so they can be tested without the binary.

pub mod commands;
pub mod config;
pub mod render;
