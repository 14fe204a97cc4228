//! Form state
//!
//! Values, errors and touched fields of one mounted form. Errors are
//! computed eagerly but only *shown* for a field once it has been blurred or
//! after the first submit attempt.

use indexmap::IndexSet;
use urna_schema::{validate, validate_field, ErrorMap, FieldValues, FormSchema, SchemaError};

/// Mutable state of one form instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: FieldValues,
    errors: ErrorMap,
    touched: IndexSet<String>,
    submit_count: u32,
}

impl FormState {
    /// Fresh state holding the schema defaults
    #[must_use]
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            values: schema.defaults(),
            errors: ErrorMap::new(),
            touched: IndexSet::new(),
            submit_count: 0,
        }
    }

    /// Current raw values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Current value of `field`
    #[inline]
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// All recorded errors, shown or not
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Whether `field` has been blurred
    #[inline]
    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Number of submit attempts that reached validation
    #[inline]
    #[must_use]
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Error to display for `field`, if it should be shown yet
    #[must_use]
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.submit_count > 0 || self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Record new input for `field`
    ///
    /// The field is re-validated when it is already touched or a submit was
    /// attempted; otherwise its error is left alone until blur.
    ///
    /// # Errors
    /// - `SchemaError::UnknownField` if the schema does not declare `field`
    pub fn change(
        &mut self,
        schema: &FormSchema,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), SchemaError> {
        let descriptor = schema.require_field(field)?;
        let value = value.into();

        if self.submit_count > 0 || self.is_touched(field) {
            self.record(field, descriptor.first_error(&value));
        }
        self.values.insert(descriptor.name().to_string(), value);
        Ok(())
    }

    /// Mark `field` as touched and validate it
    ///
    /// # Errors
    /// - `SchemaError::UnknownField` if the schema does not declare `field`
    pub fn blur(&mut self, schema: &FormSchema, field: &str) -> Result<(), SchemaError> {
        let value = self.value(field).unwrap_or_default();
        let error = validate_field(schema, field, value)?.map(str::to_string);

        self.touched.insert(field.to_string());
        self.record(field, error.as_deref());
        Ok(())
    }

    /// Validate every field for a submit attempt
    ///
    /// Marks all fields touched and stores the resulting error map.
    ///
    /// # Errors
    /// Returns a copy of the error map when any field fails.
    pub fn validate_for_submit(&mut self, schema: &FormSchema) -> Result<(), ErrorMap> {
        self.submit_count += 1;
        self.touched.extend(schema.field_names().map(str::to_string));

        match validate(schema, &self.values) {
            Ok(()) => {
                self.errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Back to schema defaults, as on mount
    pub fn reset(&mut self, schema: &FormSchema) {
        *self = Self::new(schema);
    }

    fn record(&mut self, field: &str, error: Option<&str>) {
        match error {
            Some(message) => self.errors.insert(field, message),
            None => {
                self.errors.remove(field);
            }
        }
    }
}
