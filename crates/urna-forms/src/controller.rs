//! Submission controller
//!
//! Owns one mounted form: its state, its lifecycle and the capabilities it
//! submits through. Mutual exclusion is by phase, not by holding a lock over
//! the collaborator call: the internal mutex is only held for synchronous
//! updates and is released before any `.await` and before the notifier runs.

use crate::collaborator::SubmissionCollaborator;
use crate::config::FormsConfig;
use crate::error::{FormError, SubmissionError};
use crate::lifecycle::{Lifecycle, SubmissionPhase};
use crate::notifier::{NotificationKind, ResultNotifier};
use crate::state::FormState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use urna_schema::{ErrorMap, FieldValues, FormKind, FormSchema};

/// Title of the generic failure notification
pub const FAILURE_TITLE: &str = "Não foi possível concluir o envio";

/// Body of the generic failure notification
pub const FAILURE_DESCRIPTION: &str = "Ocorreu um erro ao enviar o formulário. Tente novamente.";

/// Result of one submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened
    Ignored,
    /// Validation failed; errors are now visible, nothing was sent
    Invalid(ErrorMap),
    /// Collaborator accepted; the form was reset
    Succeeded,
    /// Collaborator failed or timed out; the values were kept
    Failed(SubmissionError),
    /// The form was unmounted while the submission was in flight
    Abandoned,
}

impl SubmitOutcome {
    /// Whether the values reached and were accepted by the collaborator
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug)]
struct Inner {
    state: FormState,
    lifecycle: Lifecycle,
    mounted: bool,
}

/// Controller for one form instance
pub struct FormController {
    schema: Arc<FormSchema>,
    collaborator: Arc<dyn SubmissionCollaborator>,
    notifier: Arc<dyn ResultNotifier>,
    submit_timeout: Duration,
    inner: Mutex<Inner>,
    phase_tx: watch::Sender<SubmissionPhase>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("kind", &self.schema.kind())
            .field("submit_timeout", &self.submit_timeout)
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Mount a form over `schema`
    #[must_use]
    pub fn new(
        schema: impl Into<Arc<FormSchema>>,
        collaborator: Arc<dyn SubmissionCollaborator>,
        notifier: Arc<dyn ResultNotifier>,
        config: &FormsConfig,
    ) -> Self {
        let schema = schema.into();
        let (phase_tx, _) = watch::channel(SubmissionPhase::Idle);
        tracing::debug!(form = %schema.kind(), "form mounted");

        Self {
            inner: Mutex::new(Inner {
                state: FormState::new(&schema),
                lifecycle: Lifecycle::new(),
                mounted: true,
            }),
            schema,
            collaborator,
            notifier,
            submit_timeout: config.submit_timeout(),
            phase_tx,
        }
    }

    /// Schema the form was mounted with
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Form kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.schema.kind()
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.inner.lock().lifecycle.phase()
    }

    /// Every phase entered since mount
    #[must_use]
    pub fn phase_history(&self) -> Vec<SubmissionPhase> {
        self.inner.lock().lifecycle.history().to_vec()
    }

    /// Watch phase changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase_tx.subscribe()
    }

    /// Submit action should be disabled
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase().is_busy()
    }

    /// Label for the submit action in the current phase
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            self.kind().busy_label()
        } else {
            self.kind().submit_label()
        }
    }

    /// Snapshot of current values
    #[must_use]
    pub fn values(&self) -> FieldValues {
        self.inner.lock().state.values().clone()
    }

    /// Current value of one field
    #[must_use]
    pub fn value(&self, field: &str) -> Option<String> {
        self.inner.lock().state.value(field).map(str::to_string)
    }

    /// Snapshot of recorded errors
    #[must_use]
    pub fn errors(&self) -> ErrorMap {
        self.inner.lock().state.errors().clone()
    }

    /// Error to display under `field`, if any
    #[must_use]
    pub fn visible_error(&self, field: &str) -> Option<String> {
        self.inner
            .lock()
            .state
            .visible_error(field)
            .map(str::to_string)
    }

    /// Snapshot of the whole form state
    #[must_use]
    pub fn state(&self) -> FormState {
        self.inner.lock().state.clone()
    }

    /// Whether the form is still mounted
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.lock().mounted
    }

    /// Input changed
    ///
    /// Rejected while validating or submitting, since a successful
    /// submission resets every value it did not send.
    ///
    /// # Errors
    /// - `FormError::Unmounted` after [`FormController::unmount`]
    /// - `FormError::Busy` while a submission is in flight
    /// - `FormError::Schema` if the schema does not declare `field`
    pub fn change(&self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        let mut inner = self.inner.lock();
        if !inner.mounted {
            return Err(FormError::Unmounted);
        }
        if inner.lifecycle.phase().is_busy() {
            return Err(FormError::Busy);
        }
        inner.state.change(&self.schema, field, value)?;
        Ok(())
    }

    /// Input lost focus
    ///
    /// # Errors
    /// - `FormError::Unmounted` after [`FormController::unmount`]
    /// - `FormError::Schema` if the schema does not declare `field`
    pub fn blur(&self, field: &str) -> Result<(), FormError> {
        let mut inner = self.inner.lock();
        if !inner.mounted {
            return Err(FormError::Unmounted);
        }
        inner.state.blur(&self.schema, field)?;
        Ok(())
    }

    /// Tear the form down
    ///
    /// A submission still in flight settles silently: no notification, no
    /// state change.
    pub fn unmount(&self) {
        let mut inner = self.inner.lock();
        if inner.mounted {
            inner.mounted = false;
            tracing::debug!(form = %self.kind(), phase = %inner.lifecycle.phase(), "form unmounted");
        }
    }

    /// Validate and, if valid, submit the current values
    ///
    /// A request made while a submission is in flight is ignored. If the
    /// returned future is dropped before the collaborator answers, the form
    /// goes back to `idle` through `failed` with its values kept.
    ///
    /// # Errors
    /// - `FormError::Unmounted` if called after [`FormController::unmount`]
    /// - `FormError::Lifecycle` on an internal state-machine defect
    pub async fn submit(&self) -> Result<SubmitOutcome, FormError> {
        let kind = self.kind();

        let values = {
            let mut inner = self.inner.lock();
            if !inner.mounted {
                return Err(FormError::Unmounted);
            }
            if inner.lifecycle.phase() != SubmissionPhase::Idle {
                tracing::debug!(form = %kind, "submit ignored, already in flight");
                return Ok(SubmitOutcome::Ignored);
            }

            self.advance(&mut inner, SubmissionPhase::Validating)?;
            if let Err(errors) = inner.state.validate_for_submit(&self.schema) {
                self.advance(&mut inner, SubmissionPhase::Idle)?;
                return Ok(SubmitOutcome::Invalid(errors));
            }
            self.advance(&mut inner, SubmissionPhase::Submitting)?;
            inner.state.values().clone()
        };
        let flight = InFlight::new(self);

        tracing::info!(form = %kind, "submitting");
        let result = self.dispatch(kind, &values).await;
        flight.land();

        {
            let mut inner = self.inner.lock();
            if !inner.mounted {
                tracing::warn!(form = %kind, "submission settled after unmount, discarding outcome");
                return Ok(SubmitOutcome::Abandoned);
            }
            if result.is_ok() {
                self.advance(&mut inner, SubmissionPhase::Succeeded)?;
                inner.state.reset(&self.schema);
            } else {
                self.advance(&mut inner, SubmissionPhase::Failed)?;
            }
        }

        // settled phases are not idle, so a concurrent submit is still ignored here
        let outcome = match result {
            Ok(()) => {
                tracing::info!(form = %kind, "submission succeeded");
                self.notifier.notify(
                    NotificationKind::Success,
                    kind.success_title(),
                    kind.success_description(),
                );
                SubmitOutcome::Succeeded
            }
            Err(error) => {
                tracing::info!(form = %kind, %error, "submission failed");
                self.notifier
                    .notify(NotificationKind::Failure, FAILURE_TITLE, FAILURE_DESCRIPTION);
                SubmitOutcome::Failed(error)
            }
        };

        let mut inner = self.inner.lock();
        self.advance(&mut inner, SubmissionPhase::Idle)?;
        Ok(outcome)
    }

    async fn dispatch(&self, kind: FormKind, values: &FieldValues) -> Result<(), SubmissionError> {
        match tokio::time::timeout(self.submit_timeout, self.collaborator.submit(kind, values)).await
        {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.submit_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(form = %kind, timeout_ms, "submission timed out");
                Err(SubmissionError::TimedOut { timeout_ms })
            }
        }
    }

    fn advance(&self, inner: &mut Inner, to: SubmissionPhase) -> Result<(), FormError> {
        inner.lifecycle.transition(to)?;
        self.phase_tx.send_replace(to);
        Ok(())
    }
}

/// Unwinds a submission whose future was dropped while awaiting the collaborator
struct InFlight<'a> {
    controller: &'a FormController,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(controller: &'a FormController) -> Self {
        Self {
            controller,
            armed: true,
        }
    }

    /// The collaborator answered; the caller settles the lifecycle itself
    fn land(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let controller = self.controller;
        let mut inner = controller.inner.lock();
        if !inner.mounted || inner.lifecycle.phase() != SubmissionPhase::Submitting {
            return;
        }
        tracing::warn!(form = %controller.kind(), "submission dropped in flight, returning to idle");
        for to in [SubmissionPhase::Failed, SubmissionPhase::Idle] {
            if let Err(error) = controller.advance(&mut inner, to) {
                tracing::error!(%error, "cannot unwind dropped submission");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::MockSubmissionCollaborator;
    use crate::notifier::ToastQueue;
    use urna_schema::forms::{fields, messages};
    use urna_schema::{default_councils, voter_registration_schema};

    fn mount(collaborator: MockSubmissionCollaborator) -> (FormController, Arc<ToastQueue>) {
        let notifier = Arc::new(ToastQueue::default());
        let controller = FormController::new(
            voter_registration_schema(default_councils()).unwrap(),
            Arc::new(collaborator),
            notifier.clone(),
            &FormsConfig::default(),
        );
        (controller, notifier)
    }

    fn fill_valid(controller: &FormController) {
        controller.change(fields::NAME, "Ana").unwrap();
        controller.change(fields::EMAIL, "ana@x.com").unwrap();
        controller.change(fields::CPF, "12345678901").unwrap();
        controller.change(fields::COUNCIL, "municipal-sp").unwrap();
    }

    #[tokio::test]
    async fn valid_submit_calls_collaborator_once_and_resets() {
        let mut collaborator = MockSubmissionCollaborator::new();
        collaborator
            .expect_submit()
            .withf(|kind, values| {
                *kind == FormKind::VoterRegistration
                    && values.get(fields::CPF).map(String::as_str) == Some("12345678901")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let (controller, notifier) = mount(collaborator);
        fill_valid(&controller);

        let outcome = controller.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert_eq!(controller.values(), controller.schema().defaults());
        assert_eq!(controller.phase(), SubmissionPhase::Idle);
        let toasts = notifier.pending();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Success);
        assert_eq!(toasts[0].title, "Registro de eleitor concluído!");
    }

    #[tokio::test]
    async fn invalid_submit_never_calls_collaborator() {
        let mut collaborator = MockSubmissionCollaborator::new();
        collaborator.expect_submit().times(0);
        let (controller, notifier) = mount(collaborator);
        fill_valid(&controller);
        controller.change(fields::CPF, "123").unwrap();

        let outcome = controller.submit().await.unwrap();

        let errors = match outcome {
            SubmitOutcome::Invalid(errors) => errors,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert_eq!(errors.get(fields::CPF), Some(messages::CPF));
        assert_eq!(errors.len(), 1);
        assert_eq!(controller.visible_error(fields::CPF).as_deref(), Some(messages::CPF));
        assert!(notifier.is_empty());
        assert_eq!(
            controller.phase_history(),
            vec![
                SubmissionPhase::Idle,
                SubmissionPhase::Validating,
                SubmissionPhase::Idle
            ]
        );
    }

    #[tokio::test]
    async fn failed_submit_keeps_values_and_notifies() {
        let mut collaborator = MockSubmissionCollaborator::new();
        collaborator
            .expect_submit()
            .times(1)
            .returning(|_, _| Err(SubmissionError::Unavailable("offline".into())));
        let (controller, notifier) = mount(collaborator);
        fill_valid(&controller);
        let before = controller.values();

        let outcome = controller.submit().await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(SubmissionError::Unavailable("offline".into()))
        );
        assert_eq!(controller.values(), before);
        let toasts = notifier.pending();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Failure);
        assert_eq!(toasts[0].title, FAILURE_TITLE);
    }

    #[tokio::test]
    async fn operations_after_unmount_fail() {
        let mut collaborator = MockSubmissionCollaborator::new();
        collaborator.expect_submit().times(0);
        let (controller, _) = mount(collaborator);

        controller.unmount();

        assert!(!controller.is_mounted());
        assert!(matches!(controller.change(fields::NAME, "Ana"), Err(FormError::Unmounted)));
        assert!(matches!(controller.blur(fields::NAME), Err(FormError::Unmounted)));
        assert!(matches!(controller.submit().await, Err(FormError::Unmounted)));
    }

    #[test]
    fn unknown_field_is_reported() {
        let (controller, _) = mount(MockSubmissionCollaborator::new());
        let err = controller.change("phone", "1").unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn idle_label() {
        let (controller, _) = mount(MockSubmissionCollaborator::new());
        assert!(!controller.is_busy());
        assert_eq!(controller.submit_label(), "Registrar como Eleitor");
    }
}
