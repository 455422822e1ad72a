//! Provides input handling for topology files.
//!
//! This module turns input descriptors (paths, readers, in-memory text or bytes) into
//! line sources, defines the include-resolution strategy used by the parser, and hosts
//! the simple readers that load `.itp`/`.top` files without running the preprocessor.

pub mod itp;
pub mod resolver;
pub mod source;
pub mod traits;
