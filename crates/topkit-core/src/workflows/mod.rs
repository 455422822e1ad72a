//! # Workflows Module
//!
//! High-level entry points that turn a configuration into a parsed [`Topology`].
//!
//! ## Overview
//!
//! A workflow owns the wiring a caller would otherwise repeat: building the include
//! search path from the root file's location, seeding pre-defined symbols, and forwarding
//! progress events. Configuration can be assembled in code through a builder or read from
//! a TOML file.
//!
//! - **Load Workflow** ([`load`]) - Parses a root topology with every include it pulls in.
//!
//! [`Topology`]: crate::core::models::topology::Topology

pub mod load;
