//! Data models for parsed topology files.
//!
//! Fields are opaque collections of trimmed text lines; nothing in this module interprets
//! atoms, bonds or any other physical content.

pub mod document;
pub mod molecule;
pub mod topology;
