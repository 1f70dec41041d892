//! Read-only visit commands.
//!
//! Output mirrors the web views: the roster is derived the same way and the
//! visit rows carry the same placeholders.

use chispa_backend::BackendClient;
use chispa_core::detail::{CoordinatesCell, VisitRow};
use chispa_core::session::Clearance;
use chispa_core::{derive_roster, PromoterDetail, RosterEntry};

fn roster_lines(roster: &[RosterEntry]) -> Vec<String> {
    let mut lines = vec![format!("{:<36}NAME", "EMAIL")];
    lines.extend(
        roster
            .iter()
            .map(|entry| format!("{:<36}{}", entry.email, entry.name)),
    );
    lines
}

fn visit_lines(detail: &PromoterDetail) -> Vec<String> {
    let mut lines = vec![format!("Visitas de {}", detail.display_name)];
    if detail.is_empty() {
        lines.push("No se encontraron visitas para este promotor.".to_string());
        return lines;
    }
    lines.push(format!(
        "{:<10}{:<28}{:<21}{:<28}COORDINATES",
        "ID", "COMMERCE", "VISITED AT", "LOCATION"
    ));
    lines.extend(detail.visits.iter().map(visit_line));
    lines
}

fn visit_line(visit: &VisitRow) -> String {
    let coordinates = match &visit.coordinates {
        CoordinatesCell::MapLink { href, .. } => href.as_str(),
        CoordinatesCell::Placeholder => chispa_core::detail::NOT_AVAILABLE,
    };
    format!(
        "{:<10}{:<28}{:<21}{:<28}{}",
        visit.id,
        truncate(&visit.commerce, 26),
        visit.visited_at,
        truncate(&visit.location(), 26),
        coordinates
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Prints every promoter with recorded visits.
///
/// # Errors
///
/// Returns an error if the visit fetch fails.
pub(crate) async fn run_roster(backend: &BackendClient, token: &str) -> anyhow::Result<()> {
    let visits = backend.fetch_visits(token).await?;
    let roster = derive_roster(&visits);
    if roster.is_empty() {
        println!("No se encontraron promotores con visitas.");
        return Ok(());
    }
    for line in roster_lines(&roster) {
        println!("{line}");
    }
    Ok(())
}

/// Prints one promoter's visits, matched by exact email.
///
/// # Errors
///
/// Returns an error if the visit fetch fails.
pub(crate) async fn run_visits(
    backend: &BackendClient,
    token: &str,
    promoter: &str,
) -> anyhow::Result<()> {
    let visits = backend.fetch_visits(token).await?;
    for line in visit_lines(&PromoterDetail::build(&visits, promoter)) {
        println!("{line}");
    }
    Ok(())
}

/// Prints the clearance the backend's role check grants the signed-in user.
///
/// # Errors
///
/// Returns an error if the role check fails.
pub(crate) async fn run_check(backend: &BackendClient, token: &str) -> anyhow::Result<()> {
    let clearance = Clearance::from_admin_flag(backend.is_app_admin(token).await?);
    println!("clearance: {clearance}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chispa_core::Visit;
    use serde_json::json;

    use super::*;

    fn visits(value: serde_json::Value) -> Vec<Visit> {
        serde_json::from_value(value).expect("visit fixtures")
    }

    #[test]
    fn roster_lines_have_header_and_one_row_per_promoter() {
        let roster = derive_roster(&visits(json!([
            {"id_visita": 1, "email_promotor": "a@x.com", "nombre_promotor": "Ana"},
            {"id_visita": 2, "email_promotor": "a@x.com", "nombre_promotor": "Otra"},
            {"id_visita": 3, "email_promotor": "b@x.com"}
        ])));
        let lines = roster_lines(&roster);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("a@x.com"));
        assert!(lines[1].ends_with("Ana"));
        assert!(lines[2].ends_with("Promotor Desconocido"));
    }

    #[test]
    fn visit_lines_use_placeholders_and_map_url() {
        let detail = PromoterDetail::build(
            &visits(json!([
                {"id_visita": 7, "email_promotor": "a@x.com",
                 "coordenada_latitud": 10.5, "coordenada_longitud": -66.9}
            ])),
            "a@x.com",
        );
        let lines = visit_lines(&detail);
        assert_eq!(lines[0], "Visitas de a@x.com");
        assert!(lines[2].starts_with("7 "));
        assert!(lines[2].contains("N/A, N/A"));
        assert!(lines[2].ends_with("query=10.5,-66.9"));
    }

    #[test]
    fn unknown_promoter_prints_no_visits_message() {
        let lines = visit_lines(&PromoterDetail::build(&[], "nadie@x.com"));
        assert_eq!(
            lines,
            vec![
                "Visitas de nadie@x.com".to_string(),
                "No se encontraron visitas para este promotor.".to_string()
            ]
        );
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("corto", 8), "corto");
    }
}
