//! Sitebeacon - self-hosted web analytics engine
//!
//! This library provides the ingestion and aggregation core for a
//! self-hosted, client-only analytics product:
//!
//! - `storage`: durable hit store over SQLite/MySQL/PostgreSQL
//! - `gateway`: idempotent, fire-and-forget write path for the collector
//! - `sessions`: session reconstruction from the flat hit stream
//! - `report`: pure metric functions (KPIs, time series, breakdowns)
//! - `cli`: the dashboard/query surface
//! - `config`: configuration management
//! - `errors`: error types shared across the crate

pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod report;
pub mod sessions;
pub mod storage;
pub mod utils;
