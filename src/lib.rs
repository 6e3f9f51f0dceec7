//! # Grade Stats
//!
//! Student ranking and grade statistics over semester records.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, periods, rankings, results)
//! - **calculate**: Aggregate math, code normalization and rankers
//! - **statistics**: Per-level statistics and the orchestrating engine
//! - **storage**: Read-only record stores (memory, JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod statistics;
pub mod storage;

pub use models::*;
