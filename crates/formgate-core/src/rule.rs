//! Acceptance rules
//!
//! Rules are declared as data (so forms can be loaded from config files)
//! and compiled once into a [`CompiledRule`] at registration time.

use crate::error::ConfigurationError;
use crate::types::FieldId;
use regex::Regex;
use serde::{Deserialize, Serialize};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn default_letters_min() -> usize {
    2
}

/// Declarative acceptance rule over a trimmed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Letters (accented included) and inner spaces, at least `min` chars
    Letters {
        /// Minimum character count
        #[serde(default = "default_letters_min")]
        min: usize,
    },
    /// Exactly `exact` ASCII digits
    Digits {
        /// Required digit count
        exact: usize,
    },
    /// `local@domain.tld` shape, no whitespace
    Email,
    /// Caller-supplied regular expression
    Pattern {
        /// Pattern source, used as written
        regex: String,
    },
}

impl Rule {
    /// Letters rule with the given minimum length
    #[inline]
    #[must_use]
    pub fn letters(min: usize) -> Self {
        Self::Letters { min }
    }

    /// Exact digit-count rule
    #[inline]
    #[must_use]
    pub fn digits(exact: usize) -> Self {
        Self::Digits { exact }
    }

    /// Basic email-shape rule
    #[inline]
    #[must_use]
    pub fn email() -> Self {
        Self::Email
    }

    /// Custom pattern rule
    #[inline]
    #[must_use]
    pub fn pattern(regex: impl Into<String>) -> Self {
        Self::Pattern {
            regex: regex.into(),
        }
    }

    /// Regular expression this rule compiles to
    fn source(&self, field: &FieldId) -> Result<String, ConfigurationError> {
        match self {
            Self::Letters { min: 0 } => Err(ConfigurationError::InvalidRule {
                field: field.clone(),
                reason: "letters rule needs min >= 1".into(),
            }),
            Self::Letters { min } => Ok(format!(r"^[\p{{Alphabetic}}\s]{{{min},}}$")),
            Self::Digits { exact: 0 } => Err(ConfigurationError::InvalidRule {
                field: field.clone(),
                reason: "digits rule needs exact >= 1".into(),
            }),
            Self::Digits { exact } => Ok(format!("^[0-9]{{{exact}}}$")),
            Self::Email => Ok(EMAIL_PATTERN.to_string()),
            Self::Pattern { regex } => Ok(regex.clone()),
        }
    }

    /// Compile into a predicate for `field`
    ///
    /// # Errors
    /// `InvalidRule` for out-of-range parameters, `InvalidPattern` when the
    /// regular expression does not compile.
    pub fn compile(&self, field: &FieldId) -> Result<CompiledRule, ConfigurationError> {
        let source = self.source(field)?;
        let regex = Regex::new(&source).map_err(|e| ConfigurationError::InvalidPattern {
            field: field.clone(),
            reason: e.to_string(),
        })?;
        Ok(CompiledRule {
            rule: self.clone(),
            regex,
        })
    }
}

/// A rule ready for evaluation. Pure and deterministic.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: Rule,
    regex: Regex,
}

impl CompiledRule {
    /// Whether `value` satisfies the rule
    #[inline]
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The declarative rule this was compiled from
    #[inline]
    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(rule: Rule) -> CompiledRule {
        rule.compile(&FieldId::from("f")).unwrap()
    }

    #[test]
    fn letters_accepts_accents_and_spaces() {
        let rule = compile(Rule::letters(2));
        assert!(rule.accepts("Jo"));
        assert!(rule.accepts("María José"));
        assert!(rule.accepts("Ñandú"));
        assert!(!rule.accepts("J"));
        assert!(!rule.accepts("J0"));
        assert!(!rule.accepts("Ana-Luz"));
    }

    #[test]
    fn digits_requires_exact_count() {
        let rule = compile(Rule::digits(7));
        assert!(rule.accepts("1234567"));
        assert!(!rule.accepts("123"));
        assert!(!rule.accepts("12345678"));
        assert!(!rule.accepts("123456a"));
        assert!(!rule.accepts("١٢٣٤٥٦٧"));
    }

    #[test]
    fn email_shape() {
        let rule = compile(Rule::email());
        assert!(rule.accepts("a@b.co"));
        assert!(!rule.accepts("a@b"));
        assert!(!rule.accepts("a b@c.d"));
        assert!(!rule.accepts("a@@b.c"));
    }

    #[test]
    fn custom_pattern() {
        let rule = compile(Rule::pattern("^[A-Z]{3}-[0-9]{2}$"));
        assert!(rule.accepts("ABC-12"));
        assert!(!rule.accepts("abc-12"));
    }

    #[test]
    fn zero_parameters_are_configuration_errors() {
        let field = FieldId::from("f");
        assert!(matches!(
            Rule::letters(0).compile(&field),
            Err(ConfigurationError::InvalidRule { .. })
        ));
        assert!(matches!(
            Rule::digits(0).compile(&field),
            Err(ConfigurationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn broken_pattern_is_configuration_error() {
        let err = Rule::pattern("([a-z").compile(&FieldId::from("f")).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { .. }));
    }

    #[test]
    fn rules_deserialize_from_tagged_form() {
        let rule: Rule = serde_json::from_str(r#"{"kind":"letters"}"#).unwrap();
        assert_eq!(rule, Rule::letters(2));
        let rule: Rule = serde_json::from_str(r#"{"kind":"digits","exact":10}"#).unwrap();
        assert_eq!(rule, Rule::digits(10));
    }
}
