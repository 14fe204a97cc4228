//! Form schemas
//!
//! A schema is the ordered, statically declared list of field descriptors for
//! one form kind. It is checked once when built and immutable afterwards.

use crate::error::SchemaError;
use crate::field::FieldDescriptor;
use crate::forms::FormKind;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Raw field values keyed by field name, in schema order
pub type FieldValues = IndexMap<String, String>;

/// Validated, ordered set of field descriptors for one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    kind: FormKind,
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Start building a schema for `kind`
    #[inline]
    #[must_use]
    pub fn builder(kind: FormKind) -> FormSchemaBuilder {
        FormSchemaBuilder {
            kind,
            fields: Vec::new(),
        }
    }

    /// Form kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Field descriptors in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a built schema
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Look up a field by name, failing on unknown names
    ///
    /// # Errors
    /// - `SchemaError::UnknownField` if the schema does not declare `name`
    pub fn require_field(&self, name: &str) -> Result<&FieldDescriptor, SchemaError> {
        self.field(name).ok_or_else(|| SchemaError::UnknownField {
            form: self.kind,
            field: name.to_string(),
        })
    }

    /// Whether `name` is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Default values of every field, in declaration order
    #[must_use]
    pub fn defaults(&self) -> FieldValues {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.default_value().to_string()))
            .collect()
    }
}

/// Builder for [`FormSchema`]
#[derive(Debug, Clone)]
pub struct FormSchemaBuilder {
    kind: FormKind,
    fields: Vec<FieldDescriptor>,
}

impl FormSchemaBuilder {
    /// Append a field
    #[inline]
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Check and finish the schema
    ///
    /// # Errors
    /// - `SchemaError::EmptySchema` if no fields were added
    /// - `SchemaError::DuplicateField` if a name repeats
    /// - `SchemaError::NoOptions` if a select or radio field has no options
    pub fn build(self) -> Result<FormSchema, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema(self.kind));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    form: self.kind,
                    field: field.name().to_string(),
                });
            }
            if field.input().is_choice() && field.options().is_empty() {
                return Err(SchemaError::NoOptions {
                    form: self.kind,
                    field: field.name().to_string(),
                });
            }
        }

        tracing::debug!(form = %self.kind, fields = self.fields.len(), "schema built");

        Ok(FormSchema {
            kind: self.kind,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SelectOption;

    #[test]
    fn build_rejects_empty_schema() {
        let result = FormSchema::builder(FormKind::VoteCast).build();
        assert_eq!(result, Err(SchemaError::EmptySchema(FormKind::VoteCast)));
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let result = FormSchema::builder(FormKind::Candidacy)
            .field(FieldDescriptor::text("name", "Nome"))
            .field(FieldDescriptor::text("name", "Outro nome"))
            .build();

        assert!(matches!(result, Err(SchemaError::DuplicateField { field, .. }) if field == "name"));
    }

    #[test]
    fn build_rejects_choice_without_options() {
        let result = FormSchema::builder(FormKind::VoteCast)
            .field(FieldDescriptor::radio("candidateId", "Candidatos", vec![]))
            .build();

        assert!(matches!(result, Err(SchemaError::NoOptions { .. })));
    }

    #[test]
    fn lookup_and_defaults_follow_declaration_order() {
        let schema = FormSchema::builder(FormKind::VoterRegistration)
            .field(FieldDescriptor::text("name", "Nome"))
            .field(FieldDescriptor::email("email", "E-mail"))
            .field(FieldDescriptor::select(
                "council",
                "Conselho",
                vec![SelectOption::new("municipal-sp", "Municipal")],
            ))
            .build()
            .unwrap();

        assert_eq!(schema.len(), 3);
        assert!(schema.contains("email"));
        assert!(schema.require_field("cpf").is_err());
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["name", "email", "council"]
        );

        let defaults = schema.defaults();
        assert_eq!(defaults.keys().collect::<Vec<_>>(), vec!["name", "email", "council"]);
        assert!(defaults.values().all(String::is_empty));
    }
}
