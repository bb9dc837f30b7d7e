//! Composable validation rules.

use super::{child_path, Issues};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// A validation rule for a single front matter value
pub trait Rule {
    type Output;

    /// Check a present value, recording violations under `path`
    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<Self::Output>;

    /// Called when the field is absent from its parent mapping
    fn missing(&self, path: &str, issues: &mut Issues) -> Option<Self::Output> {
        issues.push(path, "is required");
        None
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn type_mismatch(expected: &str, value: &Value, path: &str, issues: &mut Issues) {
    issues.push(
        path,
        format!("expected {}, received {}", expected, describe(value)),
    );
}

/// String with optional length bounds (in characters) and pattern
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    min_len: Option<usize>,
    max_len: Option<usize>,
    pattern: Option<(&'static Regex, &'static str)>,
}

pub fn string() -> StringRule {
    StringRule::default()
}

impl StringRule {
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Require the whole value to match `pattern`, reporting `message` otherwise
    pub fn matches(mut self, pattern: &'static Regex, message: &'static str) -> Self {
        self.pattern = Some((pattern, message));
        self
    }
}

impl Rule for StringRule {
    type Output = String;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<String> {
        let Value::String(s) = value else {
            type_mismatch("string", value, path, issues);
            return None;
        };

        let len = s.chars().count();
        let mut ok = true;

        if let Some(min) = self.min_len {
            if len < min {
                issues.push(
                    path,
                    format!("must be at least {} characters long, received {}", min, len),
                );
                ok = false;
            }
        }
        if let Some(max) = self.max_len {
            if len > max {
                issues.push(
                    path,
                    format!("must be at most {} characters long, received {}", max, len),
                );
                ok = false;
            }
        }
        if let Some((pattern, message)) = self.pattern {
            if !pattern.is_match(s) {
                issues.push(path, message);
                ok = false;
            }
        }

        ok.then(|| s.clone())
    }
}

/// Non-negative integer with an optional lower bound
#[derive(Debug, Clone, Default)]
pub struct IntegerRule {
    min: Option<u64>,
}

pub fn integer() -> IntegerRule {
    IntegerRule::default()
}

impl IntegerRule {
    pub fn min(mut self, min: u64) -> Self {
        self.min = Some(min);
        self
    }
}

impl Rule for IntegerRule {
    type Output = u64;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<u64> {
        let Value::Number(number) = value else {
            type_mismatch("integer", value, path, issues);
            return None;
        };

        // 3.0 is accepted as 3, but 3.5 is not an integer
        let parsed = number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        });

        let Some(n) = parsed else {
            if number.as_i64().is_some() || number.as_f64().is_some_and(|f| f < 0.0) {
                issues.push(
                    path,
                    format!("must be at least {}, received {}", self.min.unwrap_or(0), number),
                );
            } else {
                issues.push(path, format!("must be an integer, received {}", number));
            }
            return None;
        };

        if let Some(min) = self.min {
            if n < min {
                issues.push(path, format!("must be at least {}, received {}", min, n));
                return None;
            }
        }

        Some(n)
    }
}

/// Canonical string form a date is normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `YYYY-MM-DD` (UTC)
    #[default]
    Date,
    /// `YYYY-MM-DDTHH:MM:SS.sssZ` (UTC)
    Timestamp,
}

impl DateFormat {
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        match self {
            DateFormat::Date => instant.format("%Y-%m-%d").to_string(),
            DateFormat::Timestamp => instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}

/// Parse the date and timestamp spellings front matter uses
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Date normalized to a canonical string
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRule {
    format: DateFormat,
}

pub fn date(format: DateFormat) -> DateRule {
    DateRule { format }
}

impl Rule for DateRule {
    type Output = String;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<String> {
        let Value::String(s) = value else {
            type_mismatch("date", value, path, issues);
            return None;
        };

        match parse_date(s) {
            Some(instant) => Some(self.format.format(&instant)),
            None => {
                issues.push(path, format!("invalid date \"{}\"", s));
                None
            }
        }
    }
}

/// Membership in a closed set of string literals
#[derive(Clone, Copy)]
pub struct LiteralRule<T: 'static> {
    options: &'static [T],
    name: fn(&T) -> &'static str,
}

pub fn one_of<T: 'static>(options: &'static [T], name: fn(&T) -> &'static str) -> LiteralRule<T> {
    LiteralRule { options, name }
}

impl<T: Copy + 'static> Rule for LiteralRule<T> {
    type Output = T;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<T> {
        let Value::String(s) = value else {
            type_mismatch("string", value, path, issues);
            return None;
        };

        if let Some(option) = self.options.iter().find(|option| (self.name)(option) == s) {
            return Some(*option);
        }

        let expected = self
            .options
            .iter()
            .map(|option| format!("\"{}\"", (self.name)(option)))
            .collect::<Vec<_>>()
            .join(" | ");
        issues.push(
            path,
            format!("expected one of {}, received \"{}\"", expected, s),
        );
        None
    }
}

/// Bare media filename, rewritten into a URL under a base path
#[derive(Debug, Clone)]
pub struct MediaRule {
    base_url: String,
}

pub fn media(base_url: impl Into<String>) -> MediaRule {
    MediaRule {
        base_url: base_url.into(),
    }
}

impl Rule for MediaRule {
    type Output = String;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<String> {
        let Value::String(filename) = value else {
            type_mismatch("string", value, path, issues);
            return None;
        };

        if filename.trim().is_empty() {
            issues.push(path, "must not be empty");
            return None;
        }
        if filename.contains(['/', '\\']) || filename.chars().any(char::is_whitespace) {
            issues.push(
                path,
                format!("must be a bare filename, received \"{}\"", filename),
            );
            return None;
        }

        Some(format!("{}/{}", self.base_url.trim_end_matches('/'), filename))
    }
}

/// Sequence whose every item satisfies a rule
#[derive(Debug, Clone)]
pub struct ListRule<R> {
    item: R,
}

pub fn list<R: Rule>(item: R) -> ListRule<R> {
    ListRule { item }
}

impl<R: Rule> Rule for ListRule<R> {
    type Output = Vec<R::Output>;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<Self::Output> {
        let Value::Sequence(items) = value else {
            type_mismatch("sequence", value, path, issues);
            return None;
        };

        // Check every item so all failures are reported, not only the first
        let checked: Vec<Option<R::Output>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.item.apply(item, &child_path(path, &i.to_string()), issues))
            .collect();

        checked.into_iter().collect()
    }
}

/// Field that may be absent or null
#[derive(Debug, Clone)]
pub struct OptionalRule<R> {
    inner: R,
}

pub fn optional<R: Rule>(inner: R) -> OptionalRule<R> {
    OptionalRule { inner }
}

impl<R: Rule> Rule for OptionalRule<R> {
    type Output = Option<R::Output>;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<Self::Output> {
        if value.is_null() {
            return Some(None);
        }
        self.inner.apply(value, path, issues).map(Some)
    }

    fn missing(&self, _path: &str, _issues: &mut Issues) -> Option<Self::Output> {
        Some(None)
    }
}

/// Field that falls back to a default when absent or null
pub struct DefaultRule<R: Rule> {
    inner: R,
    default: R::Output,
}

pub fn default_to<R: Rule>(inner: R, default: R::Output) -> DefaultRule<R> {
    DefaultRule { inner, default }
}

impl<R> Rule for DefaultRule<R>
where
    R: Rule,
    R::Output: Clone,
{
    type Output = R::Output;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<R::Output> {
        if value.is_null() {
            return Some(self.default.clone());
        }
        self.inner.apply(value, path, issues)
    }

    fn missing(&self, _path: &str, _issues: &mut Issues) -> Option<R::Output> {
        Some(self.default.clone())
    }
}

/// Access to the fields of one mapping during validation
pub struct Fields<'a> {
    map: &'a Mapping,
    prefix: String,
    issues: &'a mut Issues,
}

impl<'a> Fields<'a> {
    /// Fields of a document's top-level front matter
    pub fn root(map: &'a Mapping, issues: &'a mut Issues) -> Self {
        Self {
            map,
            prefix: String::new(),
            issues,
        }
    }

    /// Validate one field of this mapping with `rule`
    pub fn field<R: Rule>(&mut self, key: &str, rule: &R) -> Option<R::Output> {
        let path = child_path(&self.prefix, key);
        match self.map.get(key) {
            Some(value) => rule.apply(value, &path, self.issues),
            None => rule.missing(&path, self.issues),
        }
    }
}

/// Nested mapping validated by a closure over its [`Fields`]
#[derive(Debug, Clone)]
pub struct ObjectRule<F> {
    build: F,
}

pub fn object<F, T>(build: F) -> ObjectRule<F>
where
    F: Fn(&mut Fields<'_>) -> Option<T>,
{
    ObjectRule { build }
}

impl<F, T> Rule for ObjectRule<F>
where
    F: Fn(&mut Fields<'_>) -> Option<T>,
{
    type Output = T;

    fn apply(&self, value: &Value, path: &str, issues: &mut Issues) -> Option<T> {
        let Value::Mapping(map) = value else {
            type_mismatch("mapping", value, path, issues);
            return None;
        };

        let mut fields = Fields {
            map,
            prefix: path.to_string(),
            issues,
        };
        (self.build)(&mut fields)
    }
}
