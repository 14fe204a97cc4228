//! Urna Forms - submission lifecycle for election forms
//!
//! One reusable component instantiated per form (candidacy, voter
//! registration, vote casting):
//! - Tracks values, errors and touched fields
//! - Validates on blur, on change once touched, and on submit
//! - Runs the idle → validating → submitting → succeeded | failed lifecycle
//! - Allows one submission in flight per form
//! - Reports outcomes through an injected notifier
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use urna_forms::{FormController, FormsConfig, SimulatedCollaborator, SubmitOutcome, ToastQueue};
//! use urna_schema::{default_councils, voter_registration_schema};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FormsConfig::new();
//! let form = FormController::new(
//!     voter_registration_schema(default_councils())?,
//!     Arc::new(SimulatedCollaborator::new(Duration::from_millis(10))),
//!     Arc::new(ToastQueue::default()),
//!     &config,
//! );
//!
//! form.change("name", "Ana")?;
//! form.change("email", "ana@x.com")?;
//! form.change("cpf", "12345678901")?;
//! form.change("council", "municipal-sp")?;
//!
//! assert_eq!(form.submit().await?, SubmitOutcome::Succeeded);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod collaborator;
pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod notifier;
pub mod state;

// Re-exports for convenience
pub use collaborator::{SimulatedCollaborator, SubmissionCollaborator, SubmissionRecord};
pub use config::FormsConfig;
pub use controller::{FormController, SubmitOutcome, FAILURE_DESCRIPTION, FAILURE_TITLE};
pub use error::{ConfigError, FormError, LifecycleError, SubmissionError};
pub use lifecycle::{allowed_transitions, validate_transition, Lifecycle, SubmissionPhase};
pub use notifier::{
    ChannelNotifier, Notification, NotificationId, NotificationKind, ResultNotifier, ToastQueue,
};
pub use state::FormState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving forms
    pub use crate::{
        FormController, FormError, FormsConfig, NotificationKind, ResultNotifier,
        SubmissionCollaborator, SubmissionError, SubmissionPhase, SubmitOutcome, ToastQueue,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
