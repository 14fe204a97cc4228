//! Field constraints
//!
//! A constraint is a pure predicate over the raw string value of one field,
//! paired with the message shown when it fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `local@domain.tld`, case-insensitive. Leading dots and `..` are rejected
/// separately because the regex engine has no look-around.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .unwrap_or_else(|e| panic!("email shape pattern is invalid: {e}"))
});

/// Kind of check a constraint performs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Non-empty after trimming surrounding whitespace
    Required,
    /// At least `n` characters
    MinLength(usize),
    /// At most `n` characters
    MaxLength(usize),
    /// Exactly `n` characters (fixed-format identifiers)
    ExactLength(usize),
    /// Standard `local@domain` shape
    EmailShape,
    /// Value must be one of the listed options
    OneOf(Vec<String>),
    /// Only ASCII digits (an empty value passes)
    DigitsOnly,
}

impl ConstraintKind {
    /// Evaluate the predicate against a raw value
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Required => !value.trim().is_empty(),
            Self::MinLength(n) => char_len(value) >= *n,
            Self::MaxLength(n) => char_len(value) <= *n,
            Self::ExactLength(n) => char_len(value) == *n,
            Self::EmailShape => is_email_shaped(value),
            Self::OneOf(allowed) => allowed.iter().any(|a| a == value),
            Self::DigitsOnly => value.chars().all(|c| c.is_ascii_digit()),
        }
    }

    /// Short name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::ExactLength(_) => "exact_length",
            Self::EmailShape => "email_shape",
            Self::OneOf(_) => "one_of",
            Self::DigitsOnly => "digits_only",
        }
    }
}

/// A constraint with its failure message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// What is checked
    pub kind: ConstraintKind,
    /// Human-readable message reported when the check fails
    pub message: String,
}

impl Constraint {
    /// Create a new constraint
    #[inline]
    #[must_use]
    pub fn new(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Check a value, returning the failure message if rejected
    #[inline]
    #[must_use]
    pub fn check(&self, value: &str) -> Option<&str> {
        if self.kind.accepts(value) {
            None
        } else {
            Some(&self.message)
        }
    }
}

/// Length in Unicode scalar values, so "ç" counts once
#[inline]
fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn is_email_shaped(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_SHAPE.is_match(value)
}
