//! Textual preprocessor for topology files.
//!
//! Only the directive forms `#define`, `#ifdef`, `#ifndef`, `#else`, `#endif` are evaluated
//! here. `#include` is tokenized by [`directive`] but performed by the parser, since it
//! needs the include resolver.

pub mod conditional;
pub mod directive;
pub mod symbols;

pub use conditional::{ConditionalError, ConditionalFrame, ConditionalStack, Evaluation, Preprocessor};
pub use directive::Directive;
pub use symbols::{SymbolTable, SymbolValue};
