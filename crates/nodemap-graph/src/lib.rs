//! # nodemap graph
//!
//! Neo4j backend for nodemap.
//!
//! [`GraphClient`] runs the fetch and overwrite statements over a `neo4rs`
//! pool, so every [`nodemap_core::NodeSessionExt`] operation works against a
//! live database.

pub mod client;
pub mod config;
pub mod convert;

pub use client::GraphClient;
pub use config::{ConfigError, GraphConfig};
