//! Remote Repair Job Monitor
//!
//! This library provides the core functionality for fixwatch, a terminal
//! client that watches a remote autonomous repair job: polling and
//! cancellation, pipeline-stage mapping, score derivation, and log/fix
//! normalization. All derived values are pure functions of the latest
//! snapshot.

pub mod config;
pub mod models;
pub mod services;
