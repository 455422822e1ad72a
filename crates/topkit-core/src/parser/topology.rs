use super::context::ParseContext;
use super::error::TopologyError;
use super::progress::{ParseEvent, ProgressReporter};
use crate::core::io::resolver::{IncludeResolver, PathResolver};
use crate::core::io::source::{InputSource, LineSource};
use crate::core::models::document::section_header;
use crate::core::models::topology::Topology;
use crate::core::preprocess::{Directive, Evaluation, SymbolTable, SymbolValue};
use tracing::{debug, info, instrument, trace, warn};

/// Nesting limit for `#include`, guarding against files that include themselves.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// Builder and entry point for a preprocessed topology parse.
///
/// [`parse`](Self::parse) consumes the parser, so every instance parses exactly once.
///
/// ```ignore
/// use topkit::core::io::source::InputSource;
/// use topkit::core::preprocess::SymbolValue;
/// use topkit::parser::TopologyParser;
///
/// let topology = TopologyParser::new()
///     .define("POSRES", SymbolValue::Flag(true))
///     .parse(InputSource::path("system.top"))?;
/// for entry in topology.molecules() {
///     println!("{} x{:?}", entry.molecule_type, entry.count);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TopologyParser<R = PathResolver> {
    preprocessing: bool,
    symbols: SymbolTable,
    resolver: R,
    max_include_depth: usize,
}

impl TopologyParser<PathResolver> {
    pub fn new() -> Self {
        Self {
            preprocessing: true,
            symbols: SymbolTable::new(),
            resolver: PathResolver,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Default for TopologyParser<PathResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: IncludeResolver> TopologyParser<R> {
    /// Enables or disables evaluation of `#define`/`#ifdef`/`#ifndef`/`#else`/`#endif`.
    ///
    /// When disabled those lines are kept as ordinary content. `#include` is always
    /// performed.
    pub fn preprocessing(mut self, enabled: bool) -> Self {
        self.preprocessing = enabled;
        self
    }

    /// Defines `name` before reading starts, as if by a `#define` at the top of the root.
    pub fn define(mut self, name: impl Into<String>, value: SymbolValue) -> Self {
        self.symbols.define(name, value);
        self
    }

    pub fn symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Replaces the include resolver.
    pub fn resolver<S: IncludeResolver>(self, resolver: S) -> TopologyParser<S> {
        TopologyParser {
            preprocessing: self.preprocessing,
            symbols: self.symbols,
            resolver,
            max_include_depth: self.max_include_depth,
        }
    }

    /// Parses `root` and everything it includes, then indexes the molecule manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the root gives nothing to read, if an input cannot be read, if
    /// the resolver fails, on an unmatched or duplicated `#else`/`#endif`, or when a
    /// `[ moleculetype ]` follows a `[ system ]`/`[ molecules ]` section.
    pub fn parse(self, root: InputSource) -> Result<Topology, TopologyError> {
        self.parse_with_progress(root, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "topology_parse", fields(root = %root.display_name()))]
    pub fn parse_with_progress(
        self,
        root: InputSource,
        reporter: &ProgressReporter,
    ) -> Result<Topology, TopologyError> {
        let file = root.display_name();
        let source = root
            .open()
            .map_err(|source| TopologyError::Io { file, source })?
            .ok_or(TopologyError::MissingEntryPoint)?;

        let TopologyParser {
            preprocessing,
            symbols,
            mut resolver,
            max_include_depth,
        } = self;

        let mut ctx = ParseContext::new(symbols);
        let mut driver = Driver {
            preprocessing,
            resolver: &mut resolver,
            reporter,
            max_include_depth,
        };
        driver.read_lines(&mut ctx, source, 0)?;

        let topology = ctx.finish();
        info!(
            name = topology.name(),
            blocks = topology.blocks().len(),
            manifest = topology.molecules().len(),
            "topology parsed"
        );
        Ok(topology)
    }
}

struct Driver<'a, 'r, R> {
    preprocessing: bool,
    resolver: &'a mut R,
    reporter: &'a ProgressReporter<'r>,
    max_include_depth: usize,
}

impl<R: IncludeResolver> Driver<'_, '_, R> {
    fn read_lines(
        &mut self,
        ctx: &mut ParseContext,
        source: LineSource,
        depth: usize,
    ) -> Result<(), TopologyError> {
        let file = source.name().to_string();
        let start_level = ctx.preprocessor.stack().depth();
        let mut readable = true;
        let mut line_no = 0;

        self.reporter.report(ParseEvent::SourceStart {
            name: file.clone(),
            depth,
        });

        for line in source {
            line_no += 1;
            let line = line.map_err(|source| TopologyError::Io {
                file: file.clone(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let directive = Directive::parse(trimmed);

            if self.preprocessing {
                if let Some(directive) = &directive {
                    let evaluation = ctx
                        .preprocessor
                        .evaluate(directive, readable)
                        .map_err(|kind| TopologyError::Conditional {
                            file: file.clone(),
                            line: line_no,
                            kind,
                        })?;
                    match evaluation {
                        Evaluation::Readable(r) => {
                            readable = r;
                            continue;
                        }
                        Evaluation::Skip => continue,
                        Evaluation::NotADirective => {}
                    }
                }
            }

            if !readable {
                continue;
            }

            match directive {
                Some(Directive::Include { target }) => {
                    self.include(ctx, trimmed, target, &file, line_no, depth)?;
                    continue;
                }
                Some(Directive::Unknown(instruction)) if self.preprocessing => {
                    trace!(instruction, line = line_no, "ignoring unsupported directive");
                    continue;
                }
                _ => {}
            }

            if let Some(field) = section_header(trimmed) {
                ctx.enter_section(field, &file, line_no)?;
                continue;
            }

            ctx.push_content(trimmed);
        }

        let end_level = ctx.preprocessor.stack().depth();
        if end_level != start_level {
            warn!(
                file = %file,
                start_level,
                end_level,
                frames = ?ctx.preprocessor.stack().frames(),
                "unexpected #if/#else stack ending"
            );
            self.reporter.report(ParseEvent::Message(format!(
                "Unbalanced conditionals in '{}' (depth {} -> {})",
                file, start_level, end_level
            )));
        }

        self.reporter.report(ParseEvent::SourceFinish {
            name: file,
            lines: line_no,
        });
        Ok(())
    }

    fn include(
        &mut self,
        ctx: &mut ParseContext,
        statement: &str,
        target: Option<&str>,
        file: &str,
        line: usize,
        depth: usize,
    ) -> Result<(), TopologyError> {
        ctx.record_include(statement);

        let Some(target) = target else {
            return Err(TopologyError::MalformedInclude {
                file: file.to_string(),
                line,
                statement: statement.to_string(),
            });
        };
        if depth >= self.max_include_depth {
            return Err(TopologyError::IncludeTooDeep {
                file: file.to_string(),
                line,
                name: target.to_string(),
                max_depth: self.max_include_depth,
            });
        }

        let input = self.resolver.resolve(target)?;
        let Some(source) = input.open().map_err(|source| TopologyError::Io {
            file: target.to_string(),
            source,
        })?
        else {
            debug!(target, "include resolved to no input, skipping");
            return Ok(());
        };

        debug!(target, depth = depth + 1, "reading include");
        self.read_lines(ctx, source.named(target), depth + 1)
    }
}
