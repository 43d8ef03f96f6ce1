//! # Reconciler Library
//!
//! Extraction-stage reconciliation for staged delivery data: deduplication of
//! staged deployments, issue type classification and incident time window
//! resolution, together with the storage, configuration and telemetry layers
//! they run on.

pub mod classify;
pub mod config;
pub mod db;
pub mod dedup;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod repositories;
pub mod scope;
pub mod telemetry;
pub mod temporal;
pub use migration;
