//! Testing utilities for the Urna workspace
//!
//! Shared collaborator doubles, fixtures and mounting helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};
use urna_forms::{
    FormController, FormsConfig, SubmissionCollaborator, SubmissionError, ToastQueue,
};
use urna_schema::forms::fields;
use urna_schema::{FieldValues, FormKind, FormSchema, SelectOption};

/// Counts calls and answers with a fixed result
#[derive(Debug)]
pub struct CountingCollaborator {
    calls: AtomicUsize,
    result: Result<(), SubmissionError>,
    last: Mutex<Option<(FormKind, FieldValues)>>,
}

impl CountingCollaborator {
    pub fn accepting() -> Self {
        Self::with_result(Ok(()))
    }

    pub fn failing(error: SubmissionError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<(), SubmissionError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result,
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_submission(&self) -> Option<(FormKind, FieldValues)> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl SubmissionCollaborator for CountingCollaborator {
    async fn submit(&self, kind: FormKind, values: &FieldValues) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some((kind, values.clone()));
        self.result.clone()
    }
}

/// Holds every submission until the test releases it
#[derive(Debug)]
pub struct GatedCollaborator {
    calls: AtomicUsize,
    started: Notify,
    gate: Semaphore,
    result: Result<(), SubmissionError>,
}

impl GatedCollaborator {
    pub fn accepting() -> Self {
        Self::with_result(Ok(()))
    }

    pub fn failing(error: SubmissionError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<(), SubmissionError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            gate: Semaphore::new(0),
            result,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Resolves once a submission has entered the collaborator
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let one held submission settle
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl SubmissionCollaborator for GatedCollaborator {
    async fn submit(&self, _kind: FormKind, _values: &FieldValues) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        match self.gate.acquire().await {
            Ok(permit) => permit.forget(),
            Err(_) => return Err(SubmissionError::Unavailable("gate closed".to_string())),
        }
        self.result.clone()
    }
}

/// Never answers
#[derive(Debug, Default)]
pub struct HangingCollaborator;

#[async_trait]
impl SubmissionCollaborator for HangingCollaborator {
    async fn submit(&self, _kind: FormKind, _values: &FieldValues) -> Result<(), SubmissionError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Mount a controller with a fresh toast queue
pub fn mount(
    schema: FormSchema,
    collaborator: Arc<dyn SubmissionCollaborator>,
    config: &FormsConfig,
) -> (Arc<FormController>, Arc<ToastQueue>) {
    let notifier = Arc::new(ToastQueue::new(
        config.notification_capacity,
        config.notification_ttl(),
    ));
    let controller = FormController::new(schema, collaborator, notifier.clone(), config);
    (Arc::new(controller), notifier)
}

/// Type every value into the form
pub fn fill(controller: &FormController, values: &FieldValues) {
    for (field, value) in values {
        controller.change(field, value.clone()).unwrap();
    }
}

pub fn values(pairs: &[(&str, &str)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn valid_voter_values() -> FieldValues {
    values(&[
        (fields::NAME, "Ana"),
        (fields::EMAIL, "ana@x.com"),
        (fields::CPF, "12345678901"),
        (fields::COUNCIL, "municipal-sp"),
    ])
}

pub fn candidacy_values(biography: &str) -> FieldValues {
    let proposals = "Ampliar o acesso à cultura em áreas periféricas. ".repeat(3);
    values(&[
        (fields::NAME, "Maria Silva"),
        (fields::EMAIL, "maria@cultura.org"),
        (fields::COUNCIL, "estadual-sp"),
        (fields::BIOGRAPHY, biography),
        (fields::PROPOSALS, proposals.as_str()),
    ])
}

pub fn five_candidates() -> Vec<SelectOption> {
    [
        ("1", "Maria Silva"),
        ("2", "João Santos"),
        ("3", "Ana Rodrigues"),
        ("4", "Carlos Mendes"),
        ("5", "Beatriz Oliveira"),
    ]
    .into_iter()
    .map(|(id, name)| SelectOption::new(id, name))
    .collect()
}

/// Config with no artificial latency and a short timeout
pub fn fast_config() -> FormsConfig {
    FormsConfig::new()
        .with_simulated_latency(std::time::Duration::ZERO)
        .with_submit_timeout(std::time::Duration::from_millis(500))
}
