use super::directive::Directive;
use super::symbols::{SymbolTable, SymbolValue};
use thiserror::Error;
use tracing::trace;

/// One level of `#ifdef`/`#ifndef` nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalFrame {
    /// Opened while already unreadable. Only keeps `#else`/`#endif` balanced.
    NotEvaluated,
    /// The condition was evaluated and its branch is skipped.
    FalseBranch,
    /// The condition was evaluated and its branch is read.
    TrueBranch,
    /// The `#else` of this level has been seen.
    ElseConsumed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalStack {
    frames: Vec<ConditionalFrame>,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[ConditionalFrame] {
        &self.frames
    }

    fn push(&mut self, frame: ConditionalFrame) {
        self.frames.push(frame);
    }

    fn pop(&mut self) -> Option<ConditionalFrame> {
        self.frames.pop()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConditionalError {
    #[error("#else without a matching #ifdef/#ifndef")]
    UnmatchedElse,
    #[error("#endif without a matching #ifdef/#ifndef")]
    UnmatchedEndif,
    #[error("second #else at the same nesting level")]
    DuplicateElse,
}

/// Outcome of handing a directive to the [`Preprocessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The directive was a conditional; the line is consumed and readability is now this.
    Readable(bool),
    /// The directive was consumed without changing readability.
    Skip,
    /// Not a conditional or define; the caller routes the line.
    NotADirective,
}

/// Evaluates `#define` and the conditional directives against a symbol table.
///
/// The stack and the table are shared by every source of one parse: a define made in an
/// included file is visible to the includer afterwards, and conditionals may open in one
/// file and close in another.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    stack: ConditionalStack,
    symbols: SymbolTable,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self {
            stack: ConditionalStack::new(),
            symbols,
        }
    }

    pub fn stack(&self) -> &ConditionalStack {
        &self.stack
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    /// Applies `directive` given the current readability.
    ///
    /// `#define` only binds its name while readable. Conditionals are always applied to the
    /// stack, even inside skipped regions, so that every `#endif` finds its opener.
    pub fn evaluate(
        &mut self,
        directive: &Directive<'_>,
        readable: bool,
    ) -> Result<Evaluation, ConditionalError> {
        let evaluation = match *directive {
            Directive::Define { name, value } => {
                if readable && !name.is_empty() {
                    trace!(name, ?value, "define");
                    self.symbols.define(name, SymbolValue::from_raw(value));
                }
                Evaluation::Skip
            }
            Directive::IfDef(name) => Evaluation::Readable(self.open(readable, |s| s.is_defined(name))),
            Directive::IfNDef(name) => {
                Evaluation::Readable(self.open(readable, |s| !s.is_defined(name)))
            }
            Directive::Else => Evaluation::Readable(self.flip(readable)?),
            Directive::EndIf => Evaluation::Readable(self.close(readable)?),
            Directive::Include { .. } | Directive::Unknown(_) => Evaluation::NotADirective,
        };
        Ok(evaluation)
    }

    fn open(&mut self, readable: bool, condition: impl FnOnce(&SymbolTable) -> bool) -> bool {
        if !readable {
            self.stack.push(ConditionalFrame::NotEvaluated);
            return false;
        }
        if condition(&self.symbols) {
            self.stack.push(ConditionalFrame::TrueBranch);
            true
        } else {
            self.stack.push(ConditionalFrame::FalseBranch);
            false
        }
    }

    fn flip(&mut self, readable: bool) -> Result<bool, ConditionalError> {
        match self.stack.pop().ok_or(ConditionalError::UnmatchedElse)? {
            ConditionalFrame::FalseBranch => {
                self.stack.push(ConditionalFrame::ElseConsumed);
                Ok(true)
            }
            ConditionalFrame::TrueBranch => {
                self.stack.push(ConditionalFrame::ElseConsumed);
                Ok(false)
            }
            ConditionalFrame::ElseConsumed => Err(ConditionalError::DuplicateElse),
            ConditionalFrame::NotEvaluated => {
                self.stack.push(ConditionalFrame::NotEvaluated);
                Ok(readable)
            }
        }
    }

    // Only a `NotEvaluated` frame leaves readability as it was; every other frame
    // restores it to true. Readability is not re-derived from the remaining stack.
    fn close(&mut self, readable: bool) -> Result<bool, ConditionalError> {
        match self.stack.pop().ok_or(ConditionalError::UnmatchedEndif)? {
            ConditionalFrame::NotEvaluated => Ok(readable),
            _ => Ok(true),
        }
    }
}
