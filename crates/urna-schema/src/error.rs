//! Error types for schema construction and lookup
//!
//! These are contract errors: they indicate a caller referencing a field the
//! schema does not declare, or a schema that is malformed. They are never
//! shown to the person filling in the form.

use crate::forms::FormKind;

/// Schema contract errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Field name is not declared by the schema
    #[error("unknown field '{field}' in {form} form")]
    UnknownField {
        /// Form that was addressed
        form: FormKind,
        /// Offending field name
        field: String,
    },

    /// Field name declared twice
    #[error("field '{field}' declared more than once in {form} form")]
    DuplicateField {
        /// Form being built
        form: FormKind,
        /// Duplicated name
        field: String,
    },

    /// Schema declares no fields
    #[error("{0} form declares no fields")]
    EmptySchema(FormKind),

    /// Choice field built without options
    #[error("choice field '{field}' in {form} form has no options")]
    NoOptions {
        /// Form being built
        form: FormKind,
        /// Field without options
        field: String,
    },
}

impl SchemaError {
    /// Field the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField { field, .. }
            | Self::DuplicateField { field, .. }
            | Self::NoOptions { field, .. } => Some(field),
            Self::EmptySchema(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display() {
        let err = SchemaError::UnknownField {
            form: FormKind::VoterRegistration,
            field: "phone".to_string(),
        };
        assert!(err.to_string().contains("unknown field 'phone'"));
        assert_eq!(err.field(), Some("phone"));
        assert_eq!(SchemaError::EmptySchema(FormKind::VoteCast).field(), None);
    }
}
