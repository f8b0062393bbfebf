//! skin-price-monitor: price sampling for a catalog of CS2 skins
//!
//! This library provides the core components for:
//! - Catalog loading from a seed file or a running backend
//! - Quote adapters for Buff163 and the Steam community market
//! - Normalization of quotes into bucketed price samples
//! - Percentage change detection per (item, source) pair
//! - Dual persistence to a CSV file and PostgreSQL
//! - The sweep scheduler tying it all together
//! - Logging and metrics

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detector;
pub mod monitor;
pub mod sample;
pub mod sink;
pub mod source;
pub mod telemetry;
