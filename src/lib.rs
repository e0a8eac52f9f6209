//! Lead Pipeline Service Library
//!
//! Tracks sales leads through their lifecycle, together with the agents they
//! are assigned to and the comments left on them, and computes pipeline
//! reports over the collection.
//!
//! Layers, from the inside out:
//!
//! - [`domain`]: entities, the closed-timestamp rule, filters and report folds
//! - [`infrastructure`]: repository traits with in-memory and `PostgreSQL` backends
//! - [`service`]: validation and the operations behind each endpoint
//! - [`api`]: axum handlers, DTOs and the route table

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod service;
