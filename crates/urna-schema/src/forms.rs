//! The three election forms
//!
//! Candidacy application, voter registration and vote casting share the same
//! schema machinery; this module declares their fields, messages and the
//! texts shown around them.

use crate::error::SchemaError;
use crate::field::{FieldDescriptor, SelectOption};
use crate::schema::FormSchema;
use serde::{Deserialize, Serialize};

/// Field names used by the form definitions
pub mod fields {
    /// Full name
    pub const NAME: &str = "name";
    /// Contact e-mail
    pub const EMAIL: &str = "email";
    /// Brazilian taxpayer id, 11 characters
    pub const CPF: &str = "cpf";
    /// Council the person registers for
    pub const COUNCIL: &str = "council";
    /// Candidate biography
    pub const BIOGRAPHY: &str = "biography";
    /// Candidate proposals
    pub const PROPOSALS: &str = "proposals";
    /// Chosen candidate on the ballot
    pub const CANDIDATE_ID: &str = "candidateId";
}

/// Messages reported by the form definitions
pub mod messages {
    /// Name missing or too short
    pub const NAME: &str = "Nome é obrigatório";
    /// E-mail malformed
    pub const EMAIL: &str = "E-mail inválido";
    /// CPF not 11 characters
    pub const CPF: &str = "CPF deve ter 11 dígitos";
    /// Council missing or unknown
    pub const COUNCIL: &str = "Selecione um conselho";
    /// Biography below minimum
    pub const BIOGRAPHY_MIN: &str = "A biografia deve ter pelo menos 50 caracteres";
    /// Biography above maximum
    pub const BIOGRAPHY_MAX: &str = "A biografia deve ter no máximo 500 caracteres";
    /// Proposals below minimum
    pub const PROPOSALS_MIN: &str = "As propostas devem ter pelo menos 100 caracteres";
    /// Proposals above maximum
    pub const PROPOSALS_MAX: &str = "As propostas devem ter no máximo 1000 caracteres";
    /// No candidate chosen
    pub const CANDIDATE: &str = "Você deve selecionar um candidato";
    /// Digits-only check, available for CPF when a backend requires it
    pub const CPF_DIGITS: &str = "Digite apenas os números do CPF";
}

/// Length bounds of the candidacy text areas
pub mod limits {
    /// Minimum name length
    pub const NAME_MIN: usize = 2;
    /// CPF length
    pub const CPF_LEN: usize = 11;
    /// Biography minimum
    pub const BIOGRAPHY_MIN: usize = 50;
    /// Biography maximum
    pub const BIOGRAPHY_MAX: usize = 500;
    /// Proposals minimum
    pub const PROPOSALS_MIN: usize = 100;
    /// Proposals maximum
    pub const PROPOSALS_MAX: usize = 1000;
}

/// Which form a schema, state or submission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Application to run for a council seat
    Candidacy,
    /// Registration as a voter for a council
    VoterRegistration,
    /// Casting a vote in one election
    VoteCast,
}

impl FormKind {
    /// Every form kind
    pub const ALL: [FormKind; 3] = [Self::Candidacy, Self::VoterRegistration, Self::VoteCast];

    /// Card title
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Candidacy => "Registro de Candidatura",
            Self::VoterRegistration => "Registro de Eleitor",
            Self::VoteCast => "Votação",
        }
    }

    /// Submit button label while idle
    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Candidacy => "Enviar Candidatura",
            Self::VoterRegistration => "Registrar como Eleitor",
            Self::VoteCast => "Confirmar Voto",
        }
    }

    /// Submit button label while a submission is in flight
    #[must_use]
    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Candidacy => "Enviando...",
            Self::VoterRegistration => "Registrando...",
            Self::VoteCast => "Registrando voto...",
        }
    }

    /// Success notification title
    #[must_use]
    pub fn success_title(self) -> &'static str {
        match self {
            Self::Candidacy => "Candidatura registrada com sucesso!",
            Self::VoterRegistration => "Registro de eleitor concluído!",
            Self::VoteCast => "Voto registrado com sucesso!",
        }
    }

    /// Success notification description
    #[must_use]
    pub fn success_description(self) -> &'static str {
        match self {
            Self::Candidacy => "Sua candidatura foi enviada para análise.",
            Self::VoterRegistration => "Você está registrado para votar na próxima eleição.",
            Self::VoteCast => "Obrigado por participar da eleição.",
        }
    }

    /// Stable identifier used in logs and config
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidacy => "candidacy",
            Self::VoterRegistration => "voter_registration",
            Self::VoteCast => "vote_cast",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Councils open for registration
#[must_use]
pub fn default_councils() -> Vec<SelectOption> {
    vec![
        SelectOption::new("municipal-sp", "Conselho Municipal de Cultura - São Paulo"),
        SelectOption::new("estadual-sp", "Conselho Estadual de Cultura - São Paulo"),
    ]
}

fn name_field() -> FieldDescriptor {
    FieldDescriptor::text(fields::NAME, "Nome Completo")
        .with_placeholder("Seu nome completo")
        .required(messages::NAME)
        .min_length(limits::NAME_MIN, messages::NAME)
}

fn email_field() -> FieldDescriptor {
    FieldDescriptor::email(fields::EMAIL, "E-mail")
        .with_placeholder("seu@email.com")
        .email_shape(messages::EMAIL)
}

fn council_field(councils: Vec<SelectOption>) -> FieldDescriptor {
    FieldDescriptor::select(fields::COUNCIL, "Conselho", councils)
        .with_placeholder("Selecione um conselho")
        .required(messages::COUNCIL)
        .one_of_options(messages::COUNCIL)
}

/// Voter registration: name, e-mail, CPF, council
///
/// The CPF field only checks length. Use [`voter_registration_schema_strict`]
/// where the receiving side also requires digits only.
///
/// # Errors
/// - `SchemaError::NoOptions` if `councils` is empty
pub fn voter_registration_schema(councils: Vec<SelectOption>) -> Result<FormSchema, SchemaError> {
    FormSchema::builder(FormKind::VoterRegistration)
        .field(name_field())
        .field(email_field())
        .field(cpf_field())
        .field(council_field(councils))
        .build()
}

/// Voter registration with a digits-only CPF check after the length check
///
/// # Errors
/// - `SchemaError::NoOptions` if `councils` is empty
pub fn voter_registration_schema_strict(
    councils: Vec<SelectOption>,
) -> Result<FormSchema, SchemaError> {
    FormSchema::builder(FormKind::VoterRegistration)
        .field(name_field())
        .field(email_field())
        .field(cpf_field().digits_only(messages::CPF_DIGITS))
        .field(council_field(councils))
        .build()
}

fn cpf_field() -> FieldDescriptor {
    FieldDescriptor::text(fields::CPF, "CPF")
        .with_placeholder("Apenas números")
        .with_description("Digite apenas os números do seu CPF, sem pontos ou traços.")
        .exact_length(limits::CPF_LEN, messages::CPF)
}

/// Candidacy application: name, e-mail, council, biography, proposals
///
/// # Errors
/// - `SchemaError::NoOptions` if `councils` is empty
pub fn candidacy_schema(councils: Vec<SelectOption>) -> Result<FormSchema, SchemaError> {
    FormSchema::builder(FormKind::Candidacy)
        .field(name_field())
        .field(email_field())
        .field(council_field(councils))
        .field(
            FieldDescriptor::text_area(fields::BIOGRAPHY, "Biografia")
                .with_placeholder("Conte um pouco sobre você e sua experiência na área cultural")
                .with_description("Mínimo de 50 caracteres, máximo de 500.")
                .min_length(limits::BIOGRAPHY_MIN, messages::BIOGRAPHY_MIN)
                .max_length(limits::BIOGRAPHY_MAX, messages::BIOGRAPHY_MAX),
        )
        .field(
            FieldDescriptor::text_area(fields::PROPOSALS, "Propostas")
                .with_placeholder("Descreva suas principais propostas para o conselho")
                .with_description("Mínimo de 100 caracteres, máximo de 1000.")
                .min_length(limits::PROPOSALS_MIN, messages::PROPOSALS_MIN)
                .max_length(limits::PROPOSALS_MAX, messages::PROPOSALS_MAX),
        )
        .build()
}

/// Vote casting over the candidates of one election
///
/// # Errors
/// - `SchemaError::NoOptions` if `candidates` is empty
pub fn vote_cast_schema(candidates: Vec<SelectOption>) -> Result<FormSchema, SchemaError> {
    FormSchema::builder(FormKind::VoteCast)
        .field(
            FieldDescriptor::radio(fields::CANDIDATE_ID, "Candidatos", candidates)
                .with_description("Você só pode votar em um candidato.")
                .required(messages::CANDIDATE)
                .one_of_options(messages::CANDIDATE),
        )
        .build()
}
