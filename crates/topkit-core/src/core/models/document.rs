use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Field key holding every line seen before the first section header.
pub const HEADLINE_KEY: &str = "_____begin_____";

/// Prefix marking a comment line inside a field.
pub const COMMENT_PREFIX: char = ';';

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[ \t]*([A-Za-z0-9_]+)[ \t]*\]$").unwrap());

/// An ordered collection of named fields, each holding raw (trimmed) text lines,
/// plus the `#include` statements seen while the document was read.
///
/// Field names keep their first-insertion order, which is the order used when the
/// document is written back out. A field name is a key at most once: appending to an
/// existing field extends it, only [`set_field`](Self::set_field) replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyDocument {
    fields: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
    includes: Vec<String>,
}

impl TopologyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines of `name`, or an empty slice if the field was never seen.
    pub fn field(&self, name: &str) -> &[String] {
        self.index
            .get(name)
            .map_or(&[][..], |&i| self.fields[i].1.as_slice())
    }

    /// Returns the lines of `name` with `;` comment lines filtered out.
    pub fn field_without_comments(&self, name: &str) -> Vec<&str> {
        self.field(name)
            .iter()
            .map(String::as_str)
            .filter(|line| !line.starts_with(COMMENT_PREFIX))
            .collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in first-insertion order, including the preamble key if present.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Creates or replaces the field `name` with `lines`.
    pub fn set_field(&mut self, name: &str, lines: Vec<String>) {
        match self.index.get(name) {
            Some(&i) => self.fields[i].1 = lines,
            None => self.insert_field(name, lines),
        }
    }

    /// Appends `lines` to the field `name`, creating it if needed.
    pub fn append_field<I, S>(&mut self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into);
        match self.index.get(name) {
            Some(&i) => self.fields[i].1.extend(lines),
            None => self.insert_field(name, lines.collect()),
        }
    }

    /// Appends a single line to the field `name`, creating it if needed.
    pub fn append_field_line(&mut self, name: &str, line: impl Into<String>) {
        match self.index.get(name) {
            Some(&i) => self.fields[i].1.push(line.into()),
            None => self.insert_field(name, vec![line.into()]),
        }
    }

    /// Removes the field `name`, returning its lines if it existed.
    pub fn remove_field(&mut self, name: &str) -> Option<Vec<String>> {
        let i = self.index.remove(name)?;
        let (_, lines) = self.fields.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(lines)
    }

    /// Lines seen before the first section header.
    pub fn headlines(&self) -> &[String] {
        self.field(HEADLINE_KEY)
    }

    /// Raw `#include` lines recorded for this document, in reading order.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn push_include(&mut self, line: impl Into<String>) {
        self.includes.push(line.into());
    }

    /// The quoted target of every recorded `#include` line.
    pub fn included_files(&self) -> Vec<&str> {
        self.includes
            .iter()
            .filter_map(|line| include_target(line))
            .collect()
    }

    /// Records an include of `path` and appends the matching `#include` line at the end
    /// of `field`.
    pub fn append_include(&mut self, path: &str, field: &str) {
        let line = format!("#include \"{}\"", path);
        self.includes.push(line.clone());
        self.append_field_line(field, line);
    }

    /// Returns the subfield `subfield` of `field`.
    ///
    /// A subfield is the run of lines starting at a `; <subfield>` comment and ending
    /// before the next comment line. With `with_header` unset, the opening comment is
    /// dropped.
    pub fn subfield(&self, field: &str, subfield: &str, with_header: bool) -> Vec<&str> {
        let header = subfield_header(subfield);
        let mut inside = false;
        let mut lines = Vec::new();

        for row in self.field(field) {
            if *row == header {
                inside = true;
            } else if row.starts_with(COMMENT_PREFIX) {
                inside = false;
            }
            if inside {
                lines.push(row.as_str());
            }
        }

        if !with_header && lines.first().is_some_and(|l| l.starts_with(COMMENT_PREFIX)) {
            lines.remove(0);
        }
        lines
    }

    /// Comment lines of `field`, i.e. the headers of its subfields.
    pub fn subfield_names(&self, field: &str) -> Vec<&str> {
        self.field(field)
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(COMMENT_PREFIX))
            .collect()
    }

    /// Drops the subfield `subfield` (header included) from `field`.
    pub fn remove_subfield(&mut self, field: &str, subfield: &str) {
        let Some(&i) = self.index.get(field) else {
            return;
        };
        let header = subfield_header(subfield);
        let mut inside = false;

        self.fields[i].1.retain(|row| {
            if *row == header {
                inside = true;
            } else if row.starts_with(COMMENT_PREFIX) {
                inside = false;
            }
            !inside
        });
    }

    /// Name and `nrexcl` declared by the first non-comment line of `[ moleculetype ]`.
    ///
    /// Returns `("", None)` when the field is missing; the exclusion count is `None`
    /// when absent or not an integer.
    pub fn name_and_nrexcl(&self) -> (&str, Option<u32>) {
        let Some(line) = self
            .field("moleculetype")
            .iter()
            .find(|line| !line.starts_with(COMMENT_PREFIX))
        else {
            return ("", None);
        };

        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or("");
        let nrexcl = tokens.next().and_then(|t| t.parse().ok());
        (name, nrexcl)
    }

    pub fn atoms(&self) -> &[String] {
        self.field("atoms")
    }

    pub fn bonds(&self) -> &[String] {
        self.field("bonds")
    }

    pub fn virtual_sites(&self) -> &[String] {
        self.field("virtual_sitesn")
    }

    pub(crate) fn write_fields(
        &self,
        f: &mut fmt::Formatter<'_>,
        skip_headlines: bool,
    ) -> fmt::Result {
        for (name, lines) in &self.fields {
            if name == HEADLINE_KEY {
                if skip_headlines {
                    continue;
                }
            } else {
                write!(f, "\n[{}]\n", name)?;
            }
            for line in lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }

    fn insert_field(&mut self, name: &str, lines: Vec<String>) {
        self.index.insert(name.to_string(), self.fields.len());
        self.fields.push((name.to_string(), lines));
    }
}

impl fmt::Display for TopologyDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_fields(f, false)
    }
}

/// Returns the field name if the trimmed `line` is a section header such as `[ atoms ]`.
pub fn section_header(line: &str) -> Option<&str> {
    SECTION_HEADER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts the target between the first pair of double quotes of an include line.
pub fn include_target(line: &str) -> Option<&str> {
    let mut parts = line.splitn(3, '"');
    parts.next()?;
    let target = parts.next()?;
    // An unterminated quote is not a target.
    parts.next().map(|_| target)
}

fn subfield_header(subfield: &str) -> String {
    format!("{} {}", COMMENT_PREFIX, subfield)
}
