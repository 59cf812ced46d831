//! Path pattern parsing, matching and reverse building
//!
//! A pattern is a `/`-separated list of segments:
//!
//! - `sheets` matches the literal segment
//! - `:sheetid` binds one non-empty segment
//! - `:tab?` binds one segment if present, otherwise the parameter is absent
//! - `*rest` binds everything that is left (only allowed last)

use crate::error::ConfigError;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::BTreeMap;
use std::fmt;

/// Extracted path parameters, ordered by name
pub type Params = BTreeMap<String, String>;

/// Characters escaped when a parameter value is written back into a path
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Same as [`SEGMENT`] but keeps `/`, used for catch-all values
const CATCH_ALL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One segment of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Optional(String),
    CatchAll(String),
}

impl Segment {
    /// Parameter name bound by this segment, if any
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Param(name) | Segment::Optional(name) | Segment::CatchAll(name) => {
                Some(name)
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => write!(f, "{}", text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Optional(name) => write!(f, ":{}?", name),
            Segment::CatchAll(name) => write!(f, "*{}", name),
        }
    }
}

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern string such as `/sheets/:sheetid`
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (index, part) in raw.iter().enumerate() {
            let segment = if let Some(rest) = part.strip_prefix(':') {
                match rest.strip_suffix('?') {
                    Some(name) => Segment::Optional(valid_name(name).ok_or_else(|| {
                        invalid("optional parameter needs a name")
                    })?),
                    None => Segment::Param(
                        valid_name(rest).ok_or_else(|| invalid("parameter needs a name"))?,
                    ),
                }
            } else if let Some(name) = part.strip_prefix('*') {
                if index + 1 != raw.len() {
                    return Err(invalid("catch-all must be the last segment"));
                }
                Segment::CatchAll(
                    valid_name(name).ok_or_else(|| invalid("catch-all needs a name"))?,
                )
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        let mut seen = Vec::new();
        for name in segments.iter().filter_map(Segment::param_name) {
            if seen.contains(&name) {
                return Err(invalid(&format!("parameter '{}' appears twice", name)));
            }
            seen.push(name);
        }

        Ok(Self { segments })
    }

    /// Append a child pattern to this one
    pub fn join(&self, child: &str) -> Result<Self, ConfigError> {
        let combined = format!("{}/{}", self, child.trim_start_matches('/'));
        Self::parse(&combined)
    }

    /// Compiled segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all parameters in the pattern
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::param_name)
    }

    /// Names of the parameters that must be supplied to build a path
    pub fn required_params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Match already split and decoded path segments against the pattern
    pub fn matches(&self, path: &[String], case_sensitive: bool) -> Option<Params> {
        let mut params = Params::new();
        if match_from(&self.segments, path, case_sensitive, &mut params) {
            Some(params)
        } else {
            None
        }
    }

    /// Substitute parameters into the pattern.
    ///
    /// Returns the name of the first required parameter that is missing
    /// or empty.
    pub fn build(&self, params: &Params) -> Result<String, String> {
        let mut parts = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => parts.push(text.clone()),
                Segment::Param(name) => match params.get(name).filter(|v| !v.is_empty()) {
                    Some(value) => parts.push(utf8_percent_encode(value, SEGMENT).to_string()),
                    None => return Err(name.clone()),
                },
                Segment::Optional(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        parts.push(utf8_percent_encode(value, SEGMENT).to_string());
                    }
                }
                Segment::CatchAll(name) => {
                    if let Some(value) = params.get(name) {
                        let value = value.trim_matches('/');
                        if !value.is_empty() {
                            parts.push(utf8_percent_encode(value, CATCH_ALL).to_string());
                        }
                    }
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

fn valid_name(name: &str) -> Option<String> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    ok.then(|| name.to_string())
}

/// Backtracking matcher; optional segments try binding before skipping
fn match_from(
    pattern: &[Segment],
    path: &[String],
    case_sensitive: bool,
    params: &mut Params,
) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match head {
        Segment::Literal(text) => match path.split_first() {
            Some((first, remaining)) if literal_eq(text, first, case_sensitive) => {
                match_from(rest, remaining, case_sensitive, params)
            }
            _ => false,
        },
        Segment::Param(name) => match path.split_first() {
            Some((first, remaining)) if !first.is_empty() => {
                params.insert(name.clone(), first.clone());
                if match_from(rest, remaining, case_sensitive, params) {
                    return true;
                }
                params.remove(name);
                false
            }
            _ => false,
        },
        Segment::Optional(name) => {
            if let Some((first, remaining)) = path.split_first() {
                if !first.is_empty() {
                    params.insert(name.clone(), first.clone());
                    if match_from(rest, remaining, case_sensitive, params) {
                        return true;
                    }
                    params.remove(name);
                }
            }
            match_from(rest, path, case_sensitive, params)
        }
        Segment::CatchAll(name) => {
            params.insert(name.clone(), path.join("/"));
            true
        }
    }
}

fn literal_eq(expected: &str, actual: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        expected == actual
    } else {
        expected.eq_ignore_ascii_case(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_and_display() {
        let pattern = PathPattern::parse("/sheets/:sheetid/:tab?").unwrap();
        assert_eq!(pattern.to_string(), "/sheets/:sheetid/:tab?");
        assert_eq!(pattern.segments().len(), 3);
        assert_eq!(PathPattern::parse("/").unwrap().to_string(), "/");
        assert_eq!(PathPattern::parse("//a//b/").unwrap().to_string(), "/a/b");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(PathPattern::parse("/a/:").is_err());
        assert!(PathPattern::parse("/a/:?").is_err());
        assert!(PathPattern::parse("/*rest/more").is_err());
        assert!(PathPattern::parse("/:id/x/:id").is_err());
        assert!(PathPattern::parse("/:bad name").is_err());
    }

    #[test]
    fn test_literal_match() {
        let pattern = PathPattern::parse("/sheets").unwrap();
        assert_eq!(pattern.matches(&split("/sheets"), false), Some(Params::new()));
        assert_eq!(pattern.matches(&split("/Sheets"), false), Some(Params::new()));
        assert_eq!(pattern.matches(&split("/Sheets"), true), None);
        assert_eq!(pattern.matches(&split("/sheets/x"), false), None);
        assert_eq!(pattern.matches(&split("/"), false), None);
    }

    #[test]
    fn test_param_match() {
        let pattern = PathPattern::parse("/sheets/:sheetid").unwrap();
        let params = pattern.matches(&split("/sheets/abc123"), true).unwrap();
        assert_eq!(params.get("sheetid").map(String::as_str), Some("abc123"));
        assert!(pattern.matches(&split("/sheets"), true).is_none());
    }

    #[test]
    fn test_optional_param() {
        let pattern = PathPattern::parse("/sheets/:sheetid/:tab?").unwrap();

        let with_tab = pattern.matches(&split("/sheets/pets/food"), true).unwrap();
        assert_eq!(with_tab.get("tab").map(String::as_str), Some("food"));

        let without_tab = pattern.matches(&split("/sheets/pets"), true).unwrap();
        assert!(!without_tab.contains_key("tab"));
        assert_eq!(without_tab.get("sheetid").map(String::as_str), Some("pets"));
    }

    #[test]
    fn test_optional_backtracks() {
        let pattern = PathPattern::parse("/:lang?/about").unwrap();
        let params = pattern.matches(&split("/about"), true).unwrap();
        assert!(params.is_empty());
        let params = pattern.matches(&split("/fr/about"), true).unwrap();
        assert_eq!(params.get("lang").map(String::as_str), Some("fr"));
    }

    #[test]
    fn test_catch_all() {
        let pattern = PathPattern::parse("/*path").unwrap();
        let params = pattern.matches(&split("/a/b/c"), true).unwrap();
        assert_eq!(params.get("path").map(String::as_str), Some("a/b/c"));
        let params = pattern.matches(&split("/"), true).unwrap();
        assert_eq!(params.get("path").map(String::as_str), Some(""));
    }

    #[test]
    fn test_join() {
        let parent = PathPattern::parse("/sheets/:sheetid").unwrap();
        assert_eq!(
            parent.join(":section").unwrap().to_string(),
            "/sheets/:sheetid/:section"
        );
        assert_eq!(parent.join("").unwrap(), parent);
        assert!(parent.join("/x/:sheetid").is_err());
    }

    #[test]
    fn test_build() {
        let pattern = PathPattern::parse("/sheets/:sheetid/:tab?").unwrap();
        let mut params = Params::new();
        assert_eq!(pattern.build(&params), Err("sheetid".to_string()));

        params.insert("sheetid".into(), "super auto pets".into());
        assert_eq!(pattern.build(&params).unwrap(), "/sheets/super%20auto%20pets");

        params.insert("tab".into(), "food".into());
        assert_eq!(
            pattern.build(&params).unwrap(),
            "/sheets/super%20auto%20pets/food"
        );

        assert_eq!(PathPattern::parse("/").unwrap().build(&Params::new()).unwrap(), "/");
    }
}
