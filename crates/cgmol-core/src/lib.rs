//! # cgmol Core Library
//!
//! Turns a protein structure into a coarse-grained, physics-ready molecule: one point per
//! alpha carbon (`CA`) and at most one side-chain point (`CG`) per residue, plus the edge
//! sets a rigid-body engine needs to hold the chain together.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so that parsing, graph construction and the
//! user-facing entry points stay independent and testable.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Atom`, `Structure`, edge types),
//!   the element/radius table, geometry helpers and the fixed-column PDB reader/writer.
//!
//! - **[`engine`]: The Logic Core.** Topology configuration, error types, progress reporting
//!   and the two pure tasks: contact inference and constraint graph construction.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together: parse text, build
//!   the topology, and hand the result to renderers and physics engines through a
//!   [`workflows::scene::MoleculeScene`].

pub mod core;
pub mod engine;
pub mod workflows;
