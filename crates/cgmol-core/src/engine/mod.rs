//! # Engine Module
//!
//! The topology builder: everything that turns a parsed [`Structure`] into the edge sets
//! consumed by physics and rendering collaborators.
//!
//! - **Configuration** ([`config`]) - Contact scale, proximity cutoff, stiffness constants,
//!   chain handling and the contact search strategy
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping parser and config errors
//! - **Tasks** ([`tasks`]) - Contact inference and constraint graph construction
//!
//! Both tasks are pure: the same structure and configuration always yield the same edges.
//!
//! [`Structure`]: crate::core::models::structure::Structure

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
