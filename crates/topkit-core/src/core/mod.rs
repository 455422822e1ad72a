//! # Core Module
//!
//! Fundamental building blocks shared by the parser and the workflows.
//!
//! - **Data models** ([`models`]) - Field documents, molecule blocks and parse results
//! - **Input/Output** ([`io`]) - Input descriptors, line sources, include resolvers and the
//!   simple readers that do not run the preprocessor
//! - **Preprocessing** ([`preprocess`]) - Directive tokenization, the symbol table and the
//!   conditional stack machine

pub mod io;
pub mod models;
pub mod preprocess;
