//! `portsight` — score, rank, and simulate a portfolio of projects.
//!
//! # Layers
//! 1. [`source`] — pluggable data sources returning raw records.
//! 2. [`validation`] — raw records become [`models::Project`] / [`models::Risk`],
//!    or a [`validation::ValidationError`] naming the missing field.
//! 3. [`engine`] — pure scoring, classification, ranking, aggregation, and
//!    simulation over validated records.
//! 4. [`report`] — terminal and PDF renderers for engine output.
//!
//! [`config`] and [`session`] carry the settings and credentials that the
//! outer layers need; the engine depends on neither.

pub mod config;
pub mod engine;
pub mod models;
pub mod report;
pub mod session;
pub mod source;
pub mod validation;
