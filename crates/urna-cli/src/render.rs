//! Terminal rendering of catalogue records and form feedback

use urna_forms::{Notification, NotificationKind};
use urna_portal::{Candidate, Election, ElectionResult, ElectionStats};
use urna_schema::{ErrorMap, FormSchema};

pub(crate) fn elections(elections: &[Election]) {
    if elections.is_empty() {
        println!("Nenhuma eleição encontrada nesta categoria.");
        return;
    }
    for e in elections {
        println!(
            "{} [{}]\n  {} - {}  ({})",
            e.title,
            e.status.label(),
            e.start_date.format("%d/%m/%Y"),
            e.end_date.format("%d/%m/%Y"),
            e.id
        );
    }
}

pub(crate) fn candidates(candidates: &[Candidate]) {
    println!("Candidatos");
    for c in candidates {
        println!("\n{} ({})\n  {}", c.name, c.slug, c.summary());
    }
}

pub(crate) fn profile(c: &Candidate) {
    println!("{}\nCandidato(a) ao Conselho de Cultura\n", c.name);
    println!("Biografia\n  {}\n", c.biography);
    println!("Propostas");
    for p in &c.proposals {
        println!("  - {p}");
    }
    println!("\nExperiência");
    for x in &c.experience {
        println!("  - {x}");
    }
}

pub(crate) fn results(r: &ElectionResult) {
    println!("Resultados da Eleição\nTotal de votos: {}\n", r.total_votes);
    for c in &r.candidates {
        println!("{}: {} votos ({:.2}%)", c.name, c.votes, c.percentage);
    }
}

pub(crate) fn panel(s: &ElectionStats) {
    println!("Painel de Dados da Eleição");
    println!("Progresso da Votação: {:.2}% concluído", s.voting_progress);
    println!("Total de Eleitores: {}", s.total_voters);
    println!("Votos Registrados: {}", s.votes_count);
    println!("Taxa de Participação: {:.2}%", s.turnout * 100.0);
    println!("Número de Candidatos: {}", s.candidates_count);
}

pub(crate) fn field_errors(schema: &FormSchema, errors: &ErrorMap) {
    for (field, message) in errors.iter() {
        let label = schema.field(field).map_or(field, |f| f.label());
        eprintln!("  {label}: {message}");
    }
}

pub(crate) fn notifications(notifications: &[Notification]) {
    for n in notifications {
        let marker = match n.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Failure => "erro",
        };
        println!("[{marker}] {}\n       {}", n.title, n.description);
    }
}
