//! # Core Models Module
//!
//! Data structures for the coarse-grained molecule.
//!
//! ## Key Components
//!
//! - [`atom`] - A single coarse-grained point (backbone `CA` or branch `CG`)
//! - [`element`] - Element classes and the per-element radius table
//! - [`structure`] - The ordered atom list produced by the parser
//! - [`topology`] - Contacts, constraint edges and the combined topology
//!
//! ## Usage
//!
//! ```ignore
//! use cgmol::core::io::{pdb::PdbFile, traits::StructureFile};
//!
//! let (structure, report) = PdbFile::read_from_path("1ubq.pdb")?;
//! println!("{} atoms, {} skipped", structure.len(), report.skipped.len());
//! ```

pub mod atom;
pub mod element;
pub mod structure;
pub mod topology;
