//! Validator
//!
//! Evaluates a [`FormSchema`] against raw field values. Each field reports at
//! most one message: the first constraint it fails, in declaration order.
//! Fields are independent of each other.

use crate::error::SchemaError;
use crate::schema::{FieldValues, FormSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name → error message, in schema order
///
/// An absent key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, String>);

impl ErrorMap {
    /// Create an empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any previous one
    #[inline]
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Clear the entry for `field`
    #[inline]
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    /// Message recorded for `field`
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has an error
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields with errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field has an error
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop all entries
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate `(field, message)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names with errors
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validate every field of `schema` against `values`
///
/// Missing values are treated as the empty string. Keys in `values` that the
/// schema does not declare are a caller bug; they trip a debug assertion and
/// are otherwise ignored here (see [`check_known_fields`]).
///
/// # Errors
/// Returns the error map when at least one field fails.
pub fn validate(schema: &FormSchema, values: &FieldValues) -> Result<(), ErrorMap> {
    debug_assert!(
        check_known_fields(schema, values).is_ok(),
        "values carry fields not declared by the {} schema",
        schema.kind()
    );

    let errors: ErrorMap = schema
        .fields()
        .iter()
        .filter_map(|field| {
            let value = values.get(field.name()).map_or("", String::as_str);
            field
                .first_error(value)
                .map(|message| (field.name(), message))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(form = %schema.kind(), failed = errors.len(), "validation failed");
        Err(errors)
    }
}

/// Validate a single field
///
/// Returns the first failing message, or `None` when the value passes.
///
/// # Errors
/// - `SchemaError::UnknownField` if `name` is not declared
pub fn validate_field<'s>(
    schema: &'s FormSchema,
    name: &str,
    value: &str,
) -> Result<Option<&'s str>, SchemaError> {
    let field = schema.require_field(name)?;
    Ok(field.first_error(value))
}

/// Check that `values` only carries fields the schema declares
///
/// # Errors
/// - `SchemaError::UnknownField` for the first undeclared key
pub fn check_known_fields(schema: &FormSchema, values: &FieldValues) -> Result<(), SchemaError> {
    match values.keys().find(|k| !schema.contains(k)) {
        Some(unknown) => Err(SchemaError::UnknownField {
            form: schema.kind(),
            field: unknown.clone(),
        }),
        None => Ok(()),
    }
}
