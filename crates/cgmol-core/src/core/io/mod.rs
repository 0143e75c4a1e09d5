//! Provides input/output functionality for molecular coordinate files.
//!
//! The [`traits::StructureFile`] trait gives every format the same read/write surface;
//! [`pdb`] implements it for the fixed-column Protein Data Bank format, reduced to the
//! coarse-grained `CA`/`CG` representation.

pub mod pdb;
pub mod traits;
