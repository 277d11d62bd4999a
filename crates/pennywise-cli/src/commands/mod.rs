//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Metric derivation and classification (analyze, classify)
//! - `compare` - Form submission and population comparison
//! - `core` - Shared utilities (config, dashboard, input loading)
//! - `dataset` - Reference population inspection
//! - `status` - Field catalog and configuration display

pub mod analyze;
pub mod compare;
pub mod core;
pub mod dataset;
pub mod status;

// Re-export command functions for main.rs
pub use analyze::*;
pub use compare::*;
pub use core::*;
pub use dataset::*;
pub use status::*;
