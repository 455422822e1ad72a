use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Value bound to a `#define`d name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SymbolValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SymbolValue {
    /// Coerces the raw text following a defined name.
    ///
    /// No value means `Flag(true)`; anything that parses as a number other than NaN becomes
    /// `Number`, infinities included; anything else is kept verbatim as `Text`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => SymbolValue::Flag(true),
            Some(text) => match text.parse::<f64>() {
                Ok(n) if !n.is_nan() => SymbolValue::Number(n),
                _ => SymbolValue::Text(text.to_string()),
            },
        }
    }
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolValue::Flag(b) => write!(f, "{}", b),
            SymbolValue::Number(n) => write!(f, "{}", n),
            SymbolValue::Text(s) => f.write_str(s),
        }
    }
}

/// Flat name → value table filled by `#define`. Lives for a single parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolValue>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing any previous value.
    pub fn define(&mut self, name: impl Into<String>, value: SymbolValue) {
        self.symbols.insert(name.into(), value);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolValue> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolValue)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, SymbolValue)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (S, SymbolValue)>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
