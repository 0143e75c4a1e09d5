//! # Workflows Module
//!
//! High-level entry points that take a structure from text to a coarse-grained
//! topology ready for a physics engine or renderer.
//!
//! ## Architecture
//!
//! - **Build Workflow** ([`build`]) - Parses PDB text (optionally), infers contacts and
//!   assembles the constraint graph, reporting each phase through a
//!   [`ProgressReporter`](crate::engine::progress::ProgressReporter).
//! - **Scene** ([`scene`]) - Owns a built structure together with its display
//!   transform and produces the serializable export consumed by front ends.

pub mod build;
pub mod scene;
