//! Loader Options
//!
//! The configuration value handed to every assembly. Hosts pass options as
//! JSON; a regular expression travels as `{"regex": "<source>", "flags": "i"}`
//! since JSON has no native RegExp type.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ComponentError, Result, LOADER_NAME};
use crate::role::{Role, RolePatternSet};

pub const DEFAULT_TEST: &str = r"\.vue\.";

/// Wire form of a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegExpSource {
    pub regex: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flags: String,
}

impl RegExpSource {
    pub fn from_regex(re: &Regex) -> Self {
        Self {
            regex: re.as_str().to_string(),
            flags: String::new(),
        }
    }

    /// Compile, folding supported flags into an inline group so the
    /// resulting `Regex::as_str` keeps them.
    pub fn compile(&self) -> std::result::Result<Regex, String> {
        let mut inline = String::new();
        for flag in self.flags.chars() {
            match flag {
                'i' | 'm' | 's' => {
                    if !inline.contains(flag) {
                        inline.push(flag);
                    }
                }
                // JS-only flags with no bearing on a single `is_match`.
                'g' | 'u' | 'y' => {}
                other => return Err(format!("has unsupported flag '{}'", other)),
            }
        }

        let source = if inline.is_empty() {
            self.regex.clone()
        } else {
            format!("(?{}){}", inline, self.regex)
        };
        Regex::new(&source).map_err(|e| format!("has an invalid pattern: {}", e))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLoaderOptions {
    #[serde(default)]
    test: Option<Value>,
    #[serde(default)]
    extensions: Option<Map<String, Value>>,
}

/// Role patterns plus the base-match pattern.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub extensions: RolePatternSet,
    /// Splits a file name into component name and suffix.
    pub test: Regex,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            extensions: RolePatternSet::default(),
            test: default_test(),
        }
    }
}

impl LoaderOptions {
    pub fn with_test(test: Regex) -> Self {
        Self {
            test,
            ..Self::default()
        }
    }

    /// Decode host options. Missing keys fall back to defaults; a supplied
    /// `extensions` map replaces the default roles wholesale.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(json).map_err(|e| ComponentError::InvalidConfiguration {
                origin: LOADER_NAME,
                option: "options".to_string(),
                reason: format!("is not valid JSON: {}", e),
            })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let raw: RawLoaderOptions = serde_json::from_value(value.clone()).map_err(|e| {
            ComponentError::InvalidConfiguration {
                origin: LOADER_NAME,
                option: "options".to_string(),
                reason: format!("could not be decoded: {}", e),
            }
        })?;

        let test = match raw.test {
            Some(test) => parse_test_pattern(&test, LOADER_NAME)?,
            None => default_test(),
        };

        let extensions = match raw.extensions {
            Some(map) => parse_extensions(map)?,
            None => RolePatternSet::default(),
        };

        Ok(Self { extensions, test })
    }
}

pub(crate) fn default_test() -> Regex {
    Regex::new(DEFAULT_TEST).unwrap()
}

/// Decode the `test` option, which must be a RegExp object.
pub fn parse_test_pattern(value: &Value, origin: &'static str) -> Result<Regex> {
    let source: RegExpSource = serde_json::from_value(value.clone())
        .map_err(|_| ComponentError::not_a_regexp(origin, "test"))?;
    source
        .compile()
        .map_err(|reason| ComponentError::InvalidConfiguration {
            origin,
            option: "test".to_string(),
            reason,
        })
}

/// Roles keep the host's key order: the first key with a matching pattern
/// wins during classification.
fn parse_extensions(map: Map<String, Value>) -> Result<RolePatternSet> {
    let mut rules = Vec::with_capacity(map.len());

    for (name, sources) in map {
        let option = format!("extensions.{}", name);
        let invalid = |reason: String| ComponentError::InvalidConfiguration {
            origin: LOADER_NAME,
            option: option.clone(),
            reason,
        };

        let role = Role::from_declared_name(&name).ok_or_else(|| {
            invalid("is not a known role (expected template, script or style)".to_string())
        })?;
        let sources: Vec<String> = serde_json::from_value(sources)
            .map_err(|e| invalid(format!("must be a list of patterns: {}", e)))?;

        let patterns = sources
            .iter()
            .map(|src| {
                Regex::new(src).map_err(|e| invalid(format!("has an invalid pattern: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        rules.push((role, patterns));
    }

    Ok(RolePatternSet::new(rules))
}
