//! # Alignment Common Library
//!
//! Shared code for the alignment services including:
//! - Database initialization and persisted models
//! - The ten-section alignment summary type
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod summary;

pub use error::{Error, Result};
pub use summary::AlignmentSummary;
