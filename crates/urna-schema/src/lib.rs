//! Urna Schema
//!
//! Declarative field schemas and the validator for the election forms.
//!
//! # Overview
//!
//! - **Constraint**: a pure predicate over one raw value plus its message
//! - **FieldDescriptor**: one input, its presentation and ordered constraints
//! - **FormSchema**: the checked, ordered field list of one form
//! - **validate**: first failing constraint per field, independent across fields
//!
//! # Example
//!
//! ```rust
//! use urna_schema::{default_councils, validate, voter_registration_schema, FieldValues};
//!
//! let schema = voter_registration_schema(default_councils()).unwrap();
//!
//! let mut values = FieldValues::new();
//! values.insert("name".into(), "Ana".into());
//! values.insert("email".into(), "ana@x.com".into());
//! values.insert("cpf".into(), "123".into());
//! values.insert("council".into(), "municipal-sp".into());
//!
//! let errors = validate(&schema, &values).unwrap_err();
//! assert_eq!(errors.get("cpf"), Some("CPF deve ter 11 dígitos"));
//! assert_eq!(errors.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod constraint;
pub mod error;
pub mod field;
pub mod forms;
pub mod schema;
pub mod validation;

// Re-exports
pub use constraint::{Constraint, ConstraintKind};
pub use error::SchemaError;
pub use field::{FieldDescriptor, InputKind, SelectOption};
pub use forms::{
    candidacy_schema, default_councils, vote_cast_schema, voter_registration_schema,
    voter_registration_schema_strict, FormKind,
};
pub use schema::{FieldValues, FormSchema, FormSchemaBuilder};
pub use validation::{check_known_fields, validate, validate_field, ErrorMap};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema work
    pub use crate::{
        ErrorMap, FieldDescriptor, FieldValues, FormKind, FormSchema, SchemaError, SelectOption,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
