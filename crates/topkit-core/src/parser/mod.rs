//! # Parser Module
//!
//! The streaming topology parser and the molecule indexer that runs after it.
//!
//! Parsing is a single synchronous pass: lines are handled strictly in source order, and
//! an included file is fully drained before the includer resumes. The conditional stack
//! and the symbol table live in one [`context`] shared by the whole recursive read, so a
//! `#define` in an included file is visible to the includer and vice versa.

mod context;
pub mod error;
pub mod indexer;
pub mod progress;
pub mod topology;

pub use error::TopologyError;
pub use progress::{ParseEvent, ProgressReporter};
pub use topology::TopologyParser;
