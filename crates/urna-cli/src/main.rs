//! `urna` - terminal front end for the cultural-council election portal
//!
//! Browses the election catalogue and drives the candidacy, voter
//! registration and vote forms against the simulated submission service.

mod render;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use urna_forms::{
    FormController, FormsConfig, SimulatedCollaborator, SubmissionPhase, SubmitOutcome, ToastQueue,
};
use urna_portal::{ElectionDataSource, ElectionStatus, InMemoryElectionData};
use urna_schema::forms::fields;
use urna_schema::{
    candidacy_schema, default_councils, voter_registration_schema, FieldValues, FormSchema,
};

#[derive(Debug, Parser)]
#[command(name = "urna", version, about = "Eleições para Conselhos de Cultura")]
struct Cli {
    /// Forms configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the simulated submission latency, in milliseconds
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List elections
    Elections {
        /// Only elections in this status (upcoming, ongoing, completed)
        #[arg(long)]
        status: Option<ElectionStatus>,
    },
    /// List the candidates of an election
    Candidates { election: String },
    /// Show one candidate profile
    Candidate { election: String, slug: String },
    /// Show the results of an election
    Results { election: String },
    /// Show the participation panel of an election
    Panel { election: String },
    /// Register as a voter
    RegisterVoter(VoterArgs),
    /// Apply as a candidate
    Apply(CandidacyArgs),
    /// Cast a vote
    Vote {
        election: String,
        /// Candidate id or profile slug
        #[arg(long)]
        candidate: Option<String>,
    },
}

#[derive(Debug, Args)]
struct VoterArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    cpf: String,
    #[arg(long, default_value = "")]
    council: String,
}

#[derive(Debug, Args)]
struct CandidacyArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    council: String,
    #[arg(long, default_value = "")]
    biography: String,
    #[arg(long, default_value = "")]
    proposals: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => FormsConfig::load(path)
            .with_context(|| format!("loading forms config from {}", path.display()))?,
        None => FormsConfig::default(),
    };
    if let Some(ms) = cli.latency_ms {
        config = config.with_simulated_latency(Duration::from_millis(ms));
    }

    let catalogue = InMemoryElectionData::embedded().context("loading election catalogue")?;

    match cli.command {
        Command::Elections { status } => {
            let elections = match status {
                Some(status) => catalogue.elections_by_status(status).await?,
                None => catalogue.elections().await?,
            };
            render::elections(&elections);
        }
        Command::Candidates { election } => {
            render::candidates(&catalogue.candidates(&election).await?);
        }
        Command::Candidate { election, slug } => {
            render::profile(&catalogue.candidate(&election, &slug).await?);
        }
        Command::Results { election } => {
            render::results(&catalogue.results(&election).await?);
        }
        Command::Panel { election } => {
            render::panel(&catalogue.stats(&election).await?);
        }
        Command::RegisterVoter(args) => {
            let values = pairs([
                (fields::NAME, args.name),
                (fields::EMAIL, args.email),
                (fields::CPF, args.cpf),
                (fields::COUNCIL, args.council),
            ]);
            let schema = voter_registration_schema(default_councils())?;
            return exit_code(run_form(schema, values, &config).await);
        }
        Command::Apply(args) => {
            let values = pairs([
                (fields::NAME, args.name),
                (fields::EMAIL, args.email),
                (fields::COUNCIL, args.council),
                (fields::BIOGRAPHY, args.biography),
                (fields::PROPOSALS, args.proposals),
            ]);
            let schema = candidacy_schema(default_councils())?;
            return exit_code(run_form(schema, values, &config).await);
        }
        Command::Vote { election, candidate } => {
            let schema = urna_portal::vote_schema_for(&catalogue, &election).await?;
            let choice = match candidate {
                Some(wanted) => catalogue
                    .candidates(&election)
                    .await?
                    .into_iter()
                    .find(|c| c.slug == wanted)
                    .map_or(wanted, |c| c.id),
                None => String::new(),
            };
            let values = pairs([(fields::CANDIDATE_ID, choice)]);
            return exit_code(run_form(schema, values, &config).await);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn pairs<const N: usize>(entries: [(&str, String); N]) -> FieldValues {
    entries
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}

fn exit_code(submitted: anyhow::Result<bool>) -> anyhow::Result<ExitCode> {
    Ok(if submitted? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Mount a form, type the values in, submit once and print what the user would see
///
/// Returns whether the submission was accepted.
async fn run_form(
    schema: FormSchema,
    values: FieldValues,
    config: &FormsConfig,
) -> anyhow::Result<bool> {
    let toasts = Arc::new(ToastQueue::new(
        config.notification_capacity,
        config.notification_ttl(),
    ));
    let form = FormController::new(
        schema,
        Arc::new(SimulatedCollaborator::new(config.simulated_latency())),
        toasts.clone(),
        config,
    );
    for (field, value) in values {
        form.change(&field, value)?;
    }

    println!("{}", form.kind().title());
    let busy_label = form.kind().busy_label();
    let mut phases = form.subscribe();
    let progress = tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            if *phases.borrow_and_update() == SubmissionPhase::Submitting {
                println!("{busy_label}");
            }
        }
    });

    let outcome = form.submit().await?;
    progress.abort();

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            render::field_errors(form.schema(), &errors);
            Ok(false)
        }
        SubmitOutcome::Succeeded => {
            render::notifications(&toasts.drain());
            Ok(true)
        }
        SubmitOutcome::Failed(error) => {
            tracing::error!(%error, "submission failed");
            render::notifications(&toasts.drain());
            Ok(false)
        }
        SubmitOutcome::Ignored | SubmitOutcome::Abandoned => Ok(false),
    }
}
