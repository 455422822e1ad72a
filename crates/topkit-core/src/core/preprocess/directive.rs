use crate::core::models::document::include_target;
use phf::{Map, phf_map};

/// Marker opening every preprocessor line.
pub const DIRECTIVE_MARKER: char = '#';

const INCLUDE_PREFIX: &str = "#include";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instruction {
    Define,
    IfDef,
    IfNDef,
    Else,
    EndIf,
}

static INSTRUCTIONS: Map<&'static str, Instruction> = phf_map! {
    "define" => Instruction::Define,
    "ifdef"  => Instruction::IfDef,
    "ifndef" => Instruction::IfNDef,
    "else"   => Instruction::Else,
    "endif"  => Instruction::EndIf,
};

/// A preprocessor line, tokenized once and then matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `#define NAME [VALUE]`; `value` is the trimmed remainder after the name.
    Define { name: &'a str, value: Option<&'a str> },
    IfDef(&'a str),
    IfNDef(&'a str),
    Else,
    EndIf,
    /// Any line starting with `#include`. `target` is the text between the first pair of
    /// double quotes, if there is one.
    Include { target: Option<&'a str> },
    /// A `#`-prefixed line whose instruction is not supported.
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    /// Tokenizes a trimmed line. Returns `None` if the line is not a directive at all.
    ///
    /// The instruction is the first word after `#`; the argument is whatever follows the
    /// first run of whitespace after it.
    pub fn parse(line: &'a str) -> Option<Self> {
        let body = line.strip_prefix(DIRECTIVE_MARKER)?;

        if line.starts_with(INCLUDE_PREFIX) {
            return Some(Directive::Include {
                target: include_target(line),
            });
        }

        let (instruction, argument) = split_first_word(body.trim());

        let Some(&kind) = INSTRUCTIONS.get(instruction) else {
            return Some(Directive::Unknown(instruction));
        };

        let directive = match kind {
            Instruction::Define => {
                let (name, value) = split_first_word(argument);
                Directive::Define {
                    name,
                    value: (!value.is_empty()).then_some(value),
                }
            }
            Instruction::IfDef => Directive::IfDef(split_first_word(argument).0),
            Instruction::IfNDef => Directive::IfNDef(split_first_word(argument).0),
            Instruction::Else => Directive::Else,
            Instruction::EndIf => Directive::EndIf,
        };
        Some(directive)
    }

    /// Short instruction name, used in diagnostics.
    pub fn instruction(&self) -> &'a str {
        match *self {
            Directive::Define { .. } => "define",
            Directive::IfDef(_) => "ifdef",
            Directive::IfNDef(_) => "ifndef",
            Directive::Else => "else",
            Directive::EndIf => "endif",
            Directive::Include { .. } => "include",
            Directive::Unknown(instruction) => instruction,
        }
    }
}

fn split_first_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim()),
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_not_directives() {
        assert_eq!(Directive::parse("1 C 12.01"), None);
        assert_eq!(Directive::parse("[ atoms ]"), None);
    }

    #[test]
    fn define_with_and_without_value() {
        assert_eq!(
            Directive::parse("#define FLEXIBLE"),
            Some(Directive::Define {
                name: "FLEXIBLE",
                value: None
            })
        );
        assert_eq!(
            Directive::parse("#define gb_1   0.1000  1.5700e+07"),
            Some(Directive::Define {
                name: "gb_1",
                value: Some("0.1000  1.5700e+07")
            })
        );
    }

    #[test]
    fn conditionals_take_first_argument_token() {
        assert_eq!(Directive::parse("#ifdef POSRES"), Some(Directive::IfDef("POSRES")));
        assert_eq!(
            Directive::parse("#ifndef POSRES ; comment"),
            Some(Directive::IfNDef("POSRES"))
        );
        assert_eq!(Directive::parse("#ifdef"), Some(Directive::IfDef("")));
        assert_eq!(Directive::parse("#else"), Some(Directive::Else));
        assert_eq!(Directive::parse("#endif"), Some(Directive::EndIf));
    }

    #[test]
    fn whitespace_after_marker_is_tolerated() {
        assert_eq!(Directive::parse("#  ifdef\tX"), Some(Directive::IfDef("X")));
    }

    #[test]
    fn include_is_recognized_by_prefix() {
        assert_eq!(
            Directive::parse("#include \"amber99.ff/forcefield.itp\""),
            Some(Directive::Include {
                target: Some("amber99.ff/forcefield.itp")
            })
        );
        assert_eq!(
            Directive::parse("#include <oops>"),
            Some(Directive::Include { target: None })
        );
    }

    #[test]
    fn unsupported_instruction_is_unknown() {
        let directive = Directive::parse("#undef FOO").unwrap();
        assert_eq!(directive, Directive::Unknown("undef"));
        assert_eq!(directive.instruction(), "undef");
    }
}
