//! Comparing driver responses with expected outputs

use compat_core::wire::{Response, ResponseRecord};
use compat_core::{Api, ApiName, ResultCode, RuntimeVersion, ValidationStrategy};
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::{info, warn};

/// Outcome of checking one API record against its response
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub api: ApiName,
    pub version: RuntimeVersion,
    pub strategy: ValidationStrategy,
    pub passed: bool,
    pub differences: Vec<Difference>,
}

/// A specific difference between expected and actual output
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub category: DiffCategory,
    pub path: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffCategory {
    /// Success expected but the API failed, or the other way round
    Result,
    /// Body kind (string / map) differs from what the expectation needs
    ResponseType,
    Value,
    Missing,
    Extra,
    Length,
    Structure,
}

impl fmt::Display for DiffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffCategory::Result => write!(f, "RESULT"),
            DiffCategory::ResponseType => write!(f, "TYPE"),
            DiffCategory::Value => write!(f, "VALUE"),
            DiffCategory::Missing => write!(f, "MISSING"),
            DiffCategory::Extra => write!(f, "EXTRA"),
            DiffCategory::Length => write!(f, "LENGTH"),
            DiffCategory::Structure => write!(f, "STRUCTURE"),
        }
    }
}

impl Difference {
    fn new(
        category: DiffCategory,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            category,
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Check a driver response against the expected output of `api`
pub fn validate_response(api: &Api, record: &ResponseRecord) -> ComparisonResult {
    let strategy = api.output.effective_strategy();
    let expected = &api.output.content;

    let differences = match (api.output.result, &record.response) {
        (ResultCode::Failed, Response::Error(actual)) => compare_error(expected, actual, strategy),
        (ResultCode::Failed, other) => vec![Difference::new(
            DiffCategory::Result,
            "result",
            format!("failed: {}", expected),
            format!("success ({} response)", other.response_type()),
        )],
        (ResultCode::Success, Response::Error(actual)) => vec![Difference::new(
            DiffCategory::Result,
            "result",
            "success",
            format!("failed: {}", actual),
        )],
        (ResultCode::Success, Response::String(actual)) => {
            if expected == actual {
                Vec::new()
            } else {
                vec![Difference::new(DiffCategory::Value, "", expected.as_str(), actual.as_str())]
            }
        }
        (ResultCode::Success, Response::Map(actual)) => match parse_expected_map(expected) {
            Ok(expected) => compare_values(
                &Value::Mapping(expected),
                &Value::Mapping(actual.clone()),
                strategy,
            ),
            Err(difference) => vec![difference],
        },
    };

    ComparisonResult {
        api: api.name,
        version: api.version,
        strategy,
        passed: differences.is_empty(),
        differences,
    }
}

fn compare_error(expected: &str, actual: &str, strategy: ValidationStrategy) -> Vec<Difference> {
    let matched = match strategy {
        ValidationStrategy::Partial => actual.contains(expected),
        ValidationStrategy::Strict => actual == expected,
    };
    if matched {
        Vec::new()
    } else {
        vec![Difference::new(DiffCategory::Value, "error", expected, actual)]
    }
}

fn parse_expected_map(content: &str) -> Result<Mapping, Difference> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(other) => Err(Difference::new(
            DiffCategory::ResponseType,
            "",
            render(&other),
            "map",
        )),
        Err(e) => Err(Difference::new(
            DiffCategory::Structure,
            "",
            format!("YAML mapping ({})", e),
            "map",
        )),
    }
}

/// Compare two decoded values
///
/// Under [`ValidationStrategy::Partial`] every expected key must be present
/// in `actual` with a matching value and extra keys are ignored; sequences
/// are matched by position, so `expected` must be a prefix of `actual`.
/// [`ValidationStrategy::Strict`] requires deep equality.
pub fn compare_values(
    expected: &Value,
    actual: &Value,
    strategy: ValidationStrategy,
) -> Vec<Difference> {
    let mut differences = Vec::new();
    compare_at("", expected, actual, strategy, &mut differences);
    differences
}

fn compare_at(
    path: &str,
    expected: &Value,
    actual: &Value,
    strategy: ValidationStrategy,
    differences: &mut Vec<Difference>,
) {
    match (expected, actual) {
        (Value::Mapping(expected_map), Value::Mapping(actual_map)) => {
            for (key, expected_value) in expected_map {
                let child = child_path(path, key);
                match actual_map.get(key) {
                    Some(actual_value) => {
                        compare_at(&child, expected_value, actual_value, strategy, differences)
                    }
                    None => differences.push(Difference::new(
                        DiffCategory::Missing,
                        child,
                        render(expected_value),
                        "(missing)",
                    )),
                }
            }

            if strategy == ValidationStrategy::Strict {
                for (key, actual_value) in actual_map {
                    if !expected_map.contains_key(key) {
                        differences.push(Difference::new(
                            DiffCategory::Extra,
                            child_path(path, key),
                            "(not present)",
                            render(actual_value),
                        ));
                    }
                }
            }
        }
        (Value::Sequence(expected_seq), Value::Sequence(actual_seq)) => {
            let length_differs = match strategy {
                ValidationStrategy::Strict => expected_seq.len() != actual_seq.len(),
                ValidationStrategy::Partial => expected_seq.len() > actual_seq.len(),
            };
            if length_differs {
                differences.push(Difference::new(
                    DiffCategory::Length,
                    format!("{}.length", path),
                    expected_seq.len().to_string(),
                    actual_seq.len().to_string(),
                ));
            }

            for (i, (expected_item, actual_item)) in
                expected_seq.iter().zip(actual_seq.iter()).enumerate()
            {
                let child = format!("{}[{}]", path, i);
                compare_at(&child, expected_item, actual_item, strategy, differences);
            }
        }
        (Value::Mapping(_), _)
        | (Value::Sequence(_), _)
        | (_, Value::Mapping(_))
        | (_, Value::Sequence(_)) => {
            differences.push(Difference::new(
                DiffCategory::Structure,
                path,
                render(expected),
                render(actual),
            ));
        }
        _ => {
            if expected != actual {
                differences.push(Difference::new(
                    DiffCategory::Value,
                    path,
                    render(expected),
                    render(actual),
                ));
            }
        }
    }
}

fn child_path(path: &str, key: &Value) -> String {
    let key = match key {
        Value::String(s) => s.clone(),
        other => render(other),
    };
    if path.is_empty() {
        key
    } else {
        format!("{}.{}", path, key)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

impl ComparisonResult {
    /// Log the outcome, with one line per difference on failure
    pub fn log_summary(&self) {
        if self.passed {
            info!("PASS {} @ {} ({:?})", self.api, self.version, self.strategy);
        } else {
            warn!(
                "FAIL {} @ {} ({:?}, {} differences)",
                self.api,
                self.version,
                self.strategy,
                self.differences.len()
            );
            for diff in &self.differences {
                warn!(
                    "   [{:>9}] {} : expected={} actual={}",
                    diff.category, diff.path, diff.expected, diff.actual
                );
            }
        }
    }
}
