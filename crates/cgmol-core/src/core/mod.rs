//! # Core Module
//!
//! Stateless building blocks for the coarse-grained molecular model.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, elements, the ordered structure and
//!   the derived contact/constraint edge types
//! - **File I/O** ([`io`]) - Fixed-column PDB reading and writing
//! - **Utilities** ([`utils`]) - Geometry helpers such as the display transform

pub mod io;
pub mod models;
pub mod utils;
