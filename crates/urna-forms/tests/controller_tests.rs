//! Submission controller scenarios
//!
//! Drives the three forms end to end against collaborator doubles.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use urna_forms::prelude::*;
use urna_forms::{Notification, SimulatedCollaborator, FAILURE_TITLE};
use urna_schema::forms::{fields, messages};
use urna_schema::{candidacy_schema, default_councils, vote_cast_schema, voter_registration_schema};
use urna_test_utils::{
    candidacy_values, fast_config, fill, five_candidates, mount, valid_voter_values, values,
    CountingCollaborator, GatedCollaborator, HangingCollaborator,
};

fn voter_schema() -> urna_schema::FormSchema {
    voter_registration_schema(default_councils()).unwrap()
}

#[tokio::test]
async fn voter_registration_happy_path() {
    let collaborator = Arc::new(CountingCollaborator::accepting());
    let (form, toasts) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let outcome = form.submit().await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(collaborator.calls(), 1);
    assert_eq!(
        collaborator.last_submission(),
        Some((urna_schema::FormKind::VoterRegistration, valid_voter_values()))
    );
    assert_eq!(
        form.phase_history(),
        vec![
            SubmissionPhase::Idle,
            SubmissionPhase::Validating,
            SubmissionPhase::Submitting,
            SubmissionPhase::Succeeded,
            SubmissionPhase::Idle,
        ]
    );
    assert_eq!(form.values(), form.schema().defaults());
    assert!(form.errors().is_empty());
    assert_eq!(form.state().submit_count(), 0);

    let shown = toasts.pending();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].kind, NotificationKind::Success);
    assert_eq!(shown[0].description, "Você está registrado para votar na próxima eleição.");
}

#[tokio::test]
async fn short_cpf_blocks_submission() {
    let collaborator = Arc::new(CountingCollaborator::accepting());
    let (form, toasts) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());
    form.change(fields::CPF, "123").unwrap();

    let outcome = form.submit().await.unwrap();

    let expected: urna_schema::ErrorMap = [(fields::CPF, messages::CPF)].into_iter().collect();
    assert_eq!(outcome, SubmitOutcome::Invalid(expected));
    assert_eq!(collaborator.calls(), 0);
    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(toasts.is_empty());

    // values stay for correction, and fixing the field clears its error
    assert_eq!(form.value(fields::CPF).as_deref(), Some("123"));
    form.change(fields::CPF, "12345678901").unwrap();
    assert_eq!(form.visible_error(fields::CPF), None);
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Succeeded);
    assert_eq!(collaborator.calls(), 1);
}

#[tokio::test]
async fn second_submit_while_in_flight_is_ignored() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, _) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let first = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    collaborator.wait_started().await;

    assert!(form.is_busy());
    assert_eq!(form.submit_label(), "Registrando...");
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Ignored);
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Ignored);

    collaborator.release();
    assert_eq!(first.await.unwrap().unwrap(), SubmitOutcome::Succeeded);
    assert_eq!(collaborator.calls(), 1);
    assert!(!form.is_busy());
    assert_eq!(form.submit_label(), "Registrar como Eleitor");
}

#[tokio::test]
async fn concurrent_submits_dispatch_once() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, _) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let releaser = {
        let collaborator = collaborator.clone();
        async move {
            collaborator.wait_started().await;
            collaborator.release();
        }
    };
    let (a, b, ()) = futures::join!(form.submit(), form.submit(), releaser);

    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, SubmitOutcome::Succeeded));
    assert_eq!(outcomes, vec![SubmitOutcome::Ignored, SubmitOutcome::Succeeded]);
    assert_eq!(collaborator.calls(), 1);
}

#[tokio::test]
async fn failure_retains_values_and_allows_retry() {
    let collaborator = Arc::new(CountingCollaborator::failing(SubmissionError::Rejected(
        "duplicado".into(),
    )));
    let (form, toasts) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());
    let before = form.values();

    let outcome = form.submit().await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmissionError::Rejected("duplicado".into()))
    );
    assert_eq!(form.values(), before);
    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert_eq!(
        &form.phase_history()[3..],
        &[SubmissionPhase::Failed, SubmissionPhase::Idle]
    );
    assert_eq!(toasts.pending()[0].title, FAILURE_TITLE);

    // no automatic retry; the user resubmits explicitly
    assert_eq!(collaborator.calls(), 1);
    let _ = form.submit().await.unwrap();
    assert_eq!(collaborator.calls(), 2);
    assert_eq!(toasts.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_collaborator_times_out_as_failure() {
    let config = fast_config().with_submit_timeout(Duration::from_secs(3));
    let (form, toasts) = mount(voter_schema(), Arc::new(HangingCollaborator), &config);
    fill(&form, &valid_voter_values());

    let outcome = form.submit().await.unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmissionError::TimedOut { timeout_ms: 3000 })
    );
    assert_eq!(form.values(), valid_voter_values());
    assert_eq!(toasts.pending()[0].kind, NotificationKind::Failure);
}

#[tokio::test]
async fn unmount_during_flight_discards_outcome() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, toasts) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let pending = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    collaborator.wait_started().await;
    form.unmount();
    collaborator.release();

    assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Abandoned);
    assert!(toasts.is_empty());
    assert_eq!(form.values(), valid_voter_values());
    assert!(!form.phase_history().contains(&SubmissionPhase::Succeeded));
}

#[tokio::test(start_paused = true)]
async fn dropped_submit_returns_form_to_idle() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, toasts) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let dropped = tokio::time::timeout(Duration::from_millis(20), form.submit()).await;
    assert!(dropped.is_err());

    assert_eq!(form.phase(), SubmissionPhase::Idle);
    assert!(!form.is_busy());
    assert_eq!(form.submit_label(), "Registrar como Eleitor");
    assert_eq!(
        &form.phase_history()[3..],
        &[SubmissionPhase::Failed, SubmissionPhase::Idle]
    );
    assert_eq!(form.values(), valid_voter_values());
    assert!(toasts.is_empty());

    collaborator.release();
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Succeeded);
    assert_eq!(collaborator.calls(), 2);
}

#[tokio::test]
async fn input_is_rejected_while_submitting() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, _) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    let pending = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    collaborator.wait_started().await;

    assert!(matches!(form.change(fields::NAME, "Bia"), Err(FormError::Busy)));
    assert_eq!(form.value(fields::NAME).as_deref(), Some("Ana"));

    collaborator.release();
    assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Succeeded);
    form.change(fields::NAME, "Bia").unwrap();
    assert_eq!(form.value(fields::NAME).as_deref(), Some("Bia"));
}

/// Reads the form back from inside delivery
#[derive(Debug, Default)]
struct InspectingNotifier {
    form: OnceLock<Weak<FormController>>,
    seen: Mutex<Vec<(SubmissionPhase, urna_schema::FieldValues)>>,
}

impl ResultNotifier for InspectingNotifier {
    fn deliver(&self, _notification: Notification) {
        if let Some(form) = self.form.get().and_then(Weak::upgrade) {
            self.seen.lock().push((form.phase(), form.values()));
        }
    }
}

#[tokio::test]
async fn notifier_can_read_the_form_it_reports_on() {
    let schema = voter_schema();
    let defaults = schema.defaults();
    let notifier = Arc::new(InspectingNotifier::default());
    let form = Arc::new(FormController::new(
        schema,
        Arc::new(CountingCollaborator::accepting()),
        notifier.clone(),
        &fast_config(),
    ));
    notifier.form.set(Arc::downgrade(&form)).unwrap();
    fill(&form, &valid_voter_values());

    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Succeeded);

    assert_eq!(
        *notifier.seen.lock(),
        vec![(SubmissionPhase::Succeeded, defaults)]
    );
    assert_eq!(form.phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn phase_changes_are_published() {
    let collaborator = Arc::new(GatedCollaborator::accepting());
    let (form, _) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());
    let mut phases = form.subscribe();

    let pending = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    collaborator.wait_started().await;
    assert_eq!(*phases.borrow_and_update(), SubmissionPhase::Submitting);

    collaborator.release();
    pending.await.unwrap().unwrap();
    assert_eq!(*phases.borrow_and_update(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn candidacy_biography_bounds() {
    let collaborator = Arc::new(CountingCollaborator::accepting());
    let (form, _) = mount(
        candidacy_schema(default_councils()).unwrap(),
        collaborator.clone(),
        &fast_config(),
    );

    fill(&form, &candidacy_values(&"a".repeat(40)));
    let outcome = form.submit().await.unwrap();
    let expected: urna_schema::ErrorMap =
        [(fields::BIOGRAPHY, messages::BIOGRAPHY_MIN)].into_iter().collect();
    assert_eq!(outcome, SubmitOutcome::Invalid(expected));

    form.change(fields::BIOGRAPHY, "a".repeat(501)).unwrap();
    assert_eq!(
        form.visible_error(fields::BIOGRAPHY).as_deref(),
        Some(messages::BIOGRAPHY_MAX)
    );

    form.change(fields::BIOGRAPHY, "a".repeat(50)).unwrap();
    assert_eq!(form.visible_error(fields::BIOGRAPHY), None);
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Succeeded);
    assert_eq!(collaborator.calls(), 1);
}

#[tokio::test]
async fn vote_requires_a_candidate() {
    let collaborator = Arc::new(CountingCollaborator::accepting());
    let (form, toasts) = mount(
        vote_cast_schema(five_candidates()).unwrap(),
        collaborator.clone(),
        &fast_config(),
    );

    let outcome = form.submit().await.unwrap();
    let expected: urna_schema::ErrorMap =
        [(fields::CANDIDATE_ID, messages::CANDIDATE)].into_iter().collect();
    assert_eq!(outcome, SubmitOutcome::Invalid(expected));
    assert_eq!(collaborator.calls(), 0);

    for candidate in five_candidates() {
        fill(&form, &values(&[(fields::CANDIDATE_ID, candidate.value.as_str())]));
        assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Succeeded);
    }
    assert_eq!(collaborator.calls(), 5);
    assert!(toasts
        .pending()
        .iter()
        .all(|n| n.title == "Voto registrado com sucesso!"));
}

#[tokio::test]
async fn simulated_collaborator_drives_a_form() {
    let collaborator = Arc::new(SimulatedCollaborator::new(Duration::from_millis(5)));
    let (form, _) = mount(voter_schema(), collaborator.clone(), &fast_config());
    fill(&form, &valid_voter_values());

    assert!(form.submit().await.unwrap().is_success());
    assert_eq!(collaborator.received().len(), 1);
    assert_eq!(collaborator.received()[0].values, valid_voter_values());
}

#[test]
fn touched_only_errors_are_visible() {
    let (form, _) = mount(
        voter_schema(),
        Arc::new(CountingCollaborator::accepting()),
        &fast_config(),
    );

    form.change(fields::EMAIL, "ana").unwrap();
    assert_eq!(form.visible_error(fields::EMAIL), None);
    form.blur(fields::EMAIL).unwrap();
    assert_eq!(form.visible_error(fields::EMAIL).as_deref(), Some(messages::EMAIL));
    assert_eq!(form.visible_error(fields::NAME), None);
}
