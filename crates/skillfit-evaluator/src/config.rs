//! Named behavior parameters.
//!
//! The optimizer hands each candidate to the harness as a flat mapping of
//! parameter names to string values. Only a few of them matter here (the
//! kick beam offsets); they are parsed once, when a strategy is constructed,
//! so a bad candidate file fails before the first tick instead of producing
//! a silently wrong fitness.

use std::{collections::BTreeMap, num::ParseFloatError};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("missing named parameter `{key}`")]
    MissingKey { key: String },
    #[display("named parameter `{key}` = `{value}` is not a number: {source}")]
    InvalidNumber {
        key: String,
        value: String,
        source: ParseFloatError,
    },
    #[display("named parameter `{key}` = `{value}` is not finite")]
    NonFinite { key: String, value: String },
    #[display("line {line}: expected `<key> <value>`, got `{content}`")]
    MalformedLine { line: usize, content: String },
}

/// Immutable string-to-string parameter mapping.
///
/// # Example
///
/// ```
/// use skillfit_evaluator::config::NamedParams;
///
/// let params = NamedParams::parse("# kick\nkick_xoffset\t-0.18\nkick_angle 0\n").unwrap();
/// assert_eq!(params.get("kick_xoffset"), Some("-0.18"));
/// assert_eq!(params.require_f64("kick_angle").unwrap(), 0.0);
/// assert!(params.require_f64("kick_yoffset").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedParams {
    values: BTreeMap<String, String>,
}

impl NamedParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a parameter file.
    ///
    /// Each line holds a key and a value separated by whitespace. Blank lines
    /// and lines starting with `#` are skipped. Later keys override earlier ones.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                return Err(ConfigError::MalformedLine {
                    line: i + 1,
                    content: line.to_owned(),
                });
            };
            values.insert(key.to_owned(), value.trim().to_owned());
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Looks up `key` and parses it as a finite number.
    pub fn require_f64(&self, key: &str) -> Result<f64, ConfigError> {
        let value = self.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_owned(),
        })?;
        let number = value
            .parse::<f64>()
            .map_err(|source| ConfigError::InvalidNumber {
                key: key.to_owned(),
                value: value.to_owned(),
                source,
            })?;
        if !number.is_finite() {
            return Err(ConfigError::NonFinite {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(number)
    }
}

impl<K, V> FromIterator<(K, V)> for NamedParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let params = NamedParams::parse("\n# comment\n  a 1\nb\t  2.5  \n\n").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2.5"));
    }

    #[test]
    fn test_parse_rejects_key_without_value() {
        let err = NamedParams::parse("a 1\nlonely\n").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_require_f64_errors() {
        let params: NamedParams = [("x", "abc"), ("y", "inf"), ("z", "-1.5")]
            .into_iter()
            .collect();
        assert!(matches!(
            params.require_f64("x"),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            params.require_f64("y"),
            Err(ConfigError::NonFinite { .. })
        ));
        assert!(matches!(
            params.require_f64("w"),
            Err(ConfigError::MissingKey { .. })
        ));
        assert_eq!(params.require_f64("z").unwrap(), -1.5);
    }
}
