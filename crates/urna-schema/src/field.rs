//! Field descriptors
//!
//! A descriptor names one input, says how it is rendered and lists its
//! constraints in evaluation order.

use crate::constraint::{Constraint, ConstraintKind};
use serde::{Deserialize, Serialize};

/// How the input is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Single-line text
    Text,
    /// Single-line e-mail input
    Email,
    /// Multi-line text
    TextArea,
    /// Drop-down single select
    Select,
    /// Radio group single select
    Radio,
}

impl InputKind {
    /// Whether the field picks from a fixed option list
    #[inline]
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value
    pub value: String,
    /// Display label
    pub label: String,
}

impl SelectOption {
    /// Create a new option
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declaration of a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    label: String,
    input: InputKind,
    placeholder: Option<String>,
    description: Option<String>,
    options: Vec<SelectOption>,
    default_value: String,
    constraints: Vec<Constraint>,
}

impl FieldDescriptor {
    /// Create a descriptor with no constraints
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, input: InputKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            input,
            placeholder: None,
            description: None,
            options: Vec::new(),
            default_value: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Single-line text field
    #[inline]
    #[must_use]
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Text)
    }

    /// E-mail field
    #[inline]
    #[must_use]
    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Email)
    }

    /// Multi-line text field
    #[inline]
    #[must_use]
    pub fn text_area(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::TextArea)
    }

    /// Drop-down field over `options`
    #[inline]
    #[must_use]
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, InputKind::Select).with_options(options)
    }

    /// Radio group over `options`
    #[inline]
    #[must_use]
    pub fn radio(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, InputKind::Radio).with_options(options)
    }

    /// With placeholder text
    #[inline]
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// With helper text shown under the input
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With selectable options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// With a non-empty default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Append a constraint; order of calls is evaluation order
    #[inline]
    #[must_use]
    pub fn constraint(mut self, kind: ConstraintKind, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::new(kind, message));
        self
    }

    /// Append `required`
    #[inline]
    #[must_use]
    pub fn required(self, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::Required, message)
    }

    /// Append `min_length(n)`
    #[inline]
    #[must_use]
    pub fn min_length(self, n: usize, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::MinLength(n), message)
    }

    /// Append `max_length(n)`
    #[inline]
    #[must_use]
    pub fn max_length(self, n: usize, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::MaxLength(n), message)
    }

    /// Append `exact_length(n)`
    #[inline]
    #[must_use]
    pub fn exact_length(self, n: usize, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::ExactLength(n), message)
    }

    /// Append `email_shape`
    #[inline]
    #[must_use]
    pub fn email_shape(self, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::EmailShape, message)
    }

    /// Append `digits_only`
    #[inline]
    #[must_use]
    pub fn digits_only(self, message: impl Into<String>) -> Self {
        self.constraint(ConstraintKind::DigitsOnly, message)
    }

    /// Append `one_of` over the values of the field's current options
    #[must_use]
    pub fn one_of_options(self, message: impl Into<String>) -> Self {
        let allowed = self.options.iter().map(|o| o.value.clone()).collect();
        self.constraint(ConstraintKind::OneOf(allowed), message)
    }

    /// Field name, unique within its form
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Input kind
    #[inline]
    #[must_use]
    pub fn input(&self) -> InputKind {
        self.input
    }

    /// Placeholder, if any
    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Helper text, if any
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Options of a choice field
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Value the field holds on mount and after reset
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Constraints in evaluation order
    #[inline]
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// First failing constraint message for `value`
    ///
    /// Evaluation stops at the first failure; later constraints are not run.
    #[must_use]
    pub fn first_error(&self, value: &str) -> Option<&str> {
        self.constraints.iter().find_map(|c| c.check(value))
    }
}
