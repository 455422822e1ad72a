use thiserror::Error;
use topkit::core::preprocess::SymbolValue;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid define '{0}'. Expected 'NAME' or 'NAME=VALUE'.")]
    EmptyName(String),

    #[error("Invalid define name '{0}'. Names cannot contain whitespace.")]
    InvalidName(String),
}

/// Parses a `-D NAME[=VALUE]` argument. The value goes through the same coercion as the
/// text after a `#define` name.
pub fn parse_define(arg: &str) -> Result<(String, SymbolValue), ParseError> {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (arg.trim(), None),
    };

    if name.is_empty() {
        return Err(ParseError::EmptyName(arg.to_string()));
    }
    if name.contains(char::is_whitespace) {
        return Err(ParseError::InvalidName(name.to_string()));
    }

    Ok((name.to_string(), SymbolValue::from_raw(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_is_a_flag() {
        assert_eq!(
            parse_define("POSRES").unwrap(),
            ("POSRES".to_string(), SymbolValue::Flag(true))
        );
    }

    #[test]
    fn value_is_coerced() {
        assert_eq!(parse_define("FC=1000").unwrap().1, SymbolValue::Number(1000.0));
        assert_eq!(
            parse_define("MODE = strict").unwrap(),
            ("MODE".to_string(), SymbolValue::Text("strict".into()))
        );
    }

    #[test]
    fn empty_value_is_text() {
        assert_eq!(parse_define("X=").unwrap().1, SymbolValue::Text(String::new()));
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert_eq!(parse_define("=1"), Err(ParseError::EmptyName("=1".into())));
        assert_eq!(
            parse_define("TWO WORDS=1"),
            Err(ParseError::InvalidName("TWO WORDS".into()))
        );
    }
}
