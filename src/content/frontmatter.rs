//! Front-matter parsing

use serde_yaml::{Mapping, Value};
use std::fmt;
use thiserror::Error;

/// What is wrong with a single front-matter field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    Empty,
    NotAString,
    NotAStringList,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("is missing"),
            FieldProblem::Empty => f.write_str("is empty"),
            FieldProblem::NotAString => f.write_str("must be a string"),
            FieldProblem::NotAStringList => f.write_str("must be a list of strings"),
        }
    }
}

/// Errors found while reading one front-matter block
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter opened with `---` but never closed")]
    Unterminated,

    #[error("invalid YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter must be a key-value mapping")]
    NotAMapping,

    #[error("field `{field}` {problem}")]
    Field {
        field: &'static str,
        problem: FieldProblem,
    },
}

impl FrontMatterError {
    fn field(field: &'static str, problem: FieldProblem) -> Self {
        FrontMatterError::Field { field, problem }
    }
}

/// Untyped front-matter of a content file
///
/// Values are kept as parsed YAML; typed access goes through
/// [`FrontMatter::required_str`] and [`FrontMatter::string_list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    ///
    /// A file that does not open with a `---` line has no front-matter; the
    /// whole text is the body and every field lookup reports it missing.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        let opening = match lines.next() {
            Some(line) if line.trim_end() == "---" => line,
            _ => return Ok((FrontMatter::default(), content)),
        };

        let yaml_start = opening.len();
        let mut offset = yaml_start;
        for line in lines {
            if line.trim_end() == "---" {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                return Ok((Self::parse_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }

    fn parse_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(FrontMatter::default()),
            _ => Err(FrontMatterError::NotAMapping),
        }
    }

    /// Raw value of a key, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A required string field, trimmed and non-empty
    pub fn required_str(&self, key: &'static str) -> Result<String, FrontMatterError> {
        match self.get(key) {
            None | Some(Value::Null) => Err(FrontMatterError::field(key, FieldProblem::Missing)),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Err(FrontMatterError::field(key, FieldProblem::Empty))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Some(_) => Err(FrontMatterError::field(key, FieldProblem::NotAString)),
        }
    }

    /// An optional list of strings; absent means empty.
    ///
    /// Items are trimmed and blank items dropped. Any non-string item fails
    /// the whole field.
    pub fn string_list(&self, key: &'static str) -> Result<Vec<String>, FrontMatterError> {
        let items = match self.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(_) => return Err(FrontMatterError::field(key, FieldProblem::NotAStringList)),
        };

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(s) => {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        out.push(trimmed.to_string());
                    }
                }
                _ => return Err(FrontMatterError::field(key, FieldProblem::NotAStringList)),
            }
        }
        Ok(out)
    }
}
