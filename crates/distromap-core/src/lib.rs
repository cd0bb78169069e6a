//! distromap core: maps the package names of one Linux distribution onto the
//! category-qualified packages of another.
//!
//! This crate holds all mapping logic: catalog loading, the case-insensitive
//! lookup index, the rule tables, resolution and scoring, result aggregation,
//! and the build-environment planner that consumes a finished mapping.

pub mod buildenv;
pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod rules;
pub mod scoring;

pub use error::MapError;
