//! # topkit Core Library
//!
//! A parser for molecular-simulation topology files (`.top` / `.itp`) that understands
//! the textual preprocessor those formats rely on.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Plain data models (`TopologyDocument`, `MoleculeBlock`,
//!   `Topology`), line sources and include resolvers, the conditional preprocessor, and the
//!   simple non-preprocessing readers.
//!
//! - **[`parser`]: The Logic Core.** The streaming topology parser that drives line sources,
//!   evaluates conditionals, recurses into includes and splits molecule blocks out of the
//!   system document, followed by the molecule indexer that links the `[ molecules ]`
//!   manifest to those blocks.
//!
//! - **[`workflows`]: The Public API.** Configuration-driven entry points that wire a
//!   search-path resolver and pre-defined symbols into the parser.

pub mod core;
pub mod parser;
pub mod workflows;
