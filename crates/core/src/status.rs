//! Status term normalization.
//!
//! Two distinct lookups live here and they intentionally disagree in places:
//!
//! - [`normalize_search_term`] answers *queries*. It is fuzzy: "pendiente"
//!   means "anything not yet decided" and resolves to two statuses.
//! - [`resolve_target_status`] answers *updates*. It is a strict 1:1 synonym
//!   lookup: "pendiente" means exactly `Pendiente de Aprobación`.

use crate::domain::travel_request::TravelStatus;
use crate::errors::ToolError;

/// How the resolved statuses must be compared against stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    CaseInsensitive,
    Exact,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMatch {
    pub statuses: Vec<TravelStatus>,
    pub mode: MatchMode,
}

impl StatusMatch {
    pub fn labels(&self) -> Vec<&'static str> {
        self.statuses.iter().map(TravelStatus::label).collect()
    }

    fn push_unique(&mut self, status: TravelStatus) {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
    }
}

type Rule = fn(&str) -> Option<StatusMatch>;

/// Evaluated top to bottom; the first rule that yields a match wins.
const SEARCH_RULES: &[(&str, Rule)] = &[("open_requests", open_requests), ("terminal", terminal)];

fn open_requests(term: &str) -> Option<StatusMatch> {
    let mentions_open = term.contains("pendiente")
        || term.contains("sin aprobar")
        || term.contains("nuevas")
        || (term.contains("registrada") && !term.contains("aprobaci"));
    if !mentions_open {
        return None;
    }

    let mut matched =
        StatusMatch { statuses: vec![TravelStatus::Registered], mode: MatchMode::CaseInsensitive };
    if term.contains("aprobaci") || term.contains("pendiente") {
        matched.push_unique(TravelStatus::PendingApproval);
    }
    Some(matched)
}

fn terminal(term: &str) -> Option<StatusMatch> {
    let capitalized = capitalize(term);
    TravelStatus::TERMINAL
        .into_iter()
        .find(|status| status.label() == capitalized)
        .map(|status| StatusMatch { statuses: vec![status], mode: MatchMode::Exact })
}

pub fn normalize_search_term(term: &str) -> Option<StatusMatch> {
    let processed = term.trim().to_lowercase();
    if processed.is_empty() {
        return None;
    }

    for (rule, apply) in SEARCH_RULES {
        if let Some(matched) = apply(&processed) {
            tracing::debug!(
                event_name = "status.search_term.normalized",
                rule = *rule,
                search_term = term,
                statuses = ?matched.labels(),
                "search term normalized"
            );
            return Some(matched);
        }
    }

    tracing::debug!(
        event_name = "status.search_term.unrecognized",
        search_term = term,
        "search term did not match any status rule"
    );
    None
}

const TARGET_SYNONYMS: &[(&str, TravelStatus)] = &[
    ("registrada", TravelStatus::Registered),
    ("pendiente de aprobación", TravelStatus::PendingApproval),
    ("pendiente", TravelStatus::PendingApproval),
    ("aprobada", TravelStatus::Approved),
    ("rechazada", TravelStatus::Rejected),
    ("reservada", TravelStatus::Booked),
    ("completada", TravelStatus::Completed),
    ("cancelada", TravelStatus::Cancelled),
];

pub fn resolve_target_status(requested: &str) -> Result<TravelStatus, ToolError> {
    let normalized = requested.trim().to_lowercase();
    if let Some((_, status)) = TARGET_SYNONYMS.iter().find(|(synonym, _)| *synonym == normalized) {
        return Ok(*status);
    }

    TravelStatus::from_label(&capitalize(requested.trim()))
        .ok_or_else(|| ToolError::InvalidStatus { requested: requested.to_string() })
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, normalize_search_term, resolve_target_status, MatchMode};
    use crate::domain::travel_request::TravelStatus;
    use crate::errors::ToolError;

    #[test]
    fn pending_resolves_to_registered_and_pending_approval() {
        let matched = normalize_search_term("pendiente").expect("pending should match");
        assert_eq!(
            matched.statuses,
            vec![TravelStatus::Registered, TravelStatus::PendingApproval]
        );
        assert_eq!(matched.mode, MatchMode::CaseInsensitive);
    }

    #[test]
    fn pending_approval_wording_does_not_duplicate_statuses() {
        let matched = normalize_search_term("  Pendientes de Aprobación ").expect("match");
        assert_eq!(
            matched.statuses,
            vec![TravelStatus::Registered, TravelStatus::PendingApproval]
        );
    }

    #[test]
    fn unapproved_and_new_wording_resolve_to_registered_only() {
        for term in ["sin aprobar", "las nuevas", "Registrada"] {
            let matched = normalize_search_term(term).expect("match");
            assert_eq!(matched.statuses, vec![TravelStatus::Registered], "term: {term}");
        }
    }

    #[test]
    fn registered_with_approval_wording_is_not_an_open_query() {
        assert_eq!(normalize_search_term("registrada aprobación"), None);
    }

    #[test]
    fn terminal_status_resolves_exactly() {
        let matched = normalize_search_term("Aprobada").expect("approved should match");
        assert_eq!(matched.statuses, vec![TravelStatus::Approved]);
        assert_eq!(matched.mode, MatchMode::Exact);

        let matched = normalize_search_term(" CANCELADA ").expect("cancelled should match");
        assert_eq!(matched.statuses, vec![TravelStatus::Cancelled]);
    }

    #[test]
    fn unknown_and_blank_terms_are_unrecognized() {
        assert_eq!(normalize_search_term("xyz"), None);
        assert_eq!(normalize_search_term("   "), None);
        assert_eq!(normalize_search_term("aprobadas"), None);
    }

    #[test]
    fn target_pending_maps_to_pending_approval_only() {
        assert_eq!(resolve_target_status("Pendiente"), Ok(TravelStatus::PendingApproval));
        assert_eq!(
            resolve_target_status("PENDIENTE DE APROBACIÓN"),
            Ok(TravelStatus::PendingApproval)
        );
        assert_eq!(resolve_target_status(" reservada "), Ok(TravelStatus::Booked));
    }

    #[test]
    fn unknown_target_lists_valid_statuses() {
        let error = resolve_target_status("volando").expect_err("should be invalid");
        assert!(matches!(error, ToolError::InvalidStatus { .. }));
        let message = error.to_string();
        assert!(message.contains("'volando' no es un estado válido"));
        assert!(message.contains(&TravelStatus::label_list()));
    }

    #[test]
    fn capitalize_lowers_the_tail() {
        assert_eq!(capitalize("aPROBADA"), "Aprobada");
        assert_eq!(capitalize("ñu"), "Ñu");
        assert_eq!(capitalize(""), "");
    }
}
