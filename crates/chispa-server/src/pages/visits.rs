//! Promoter roster and promoter detail pages.

use axum::{
    extract::{Query, RawPathParams, State},
    response::{Html, IntoResponse, Response},
    Extension,
};
use chispa_core::detail::{
    encode_promoter_param, CoordinatesCell, VisitRow, NOT_AVAILABLE,
};
use chispa_core::{
    decode_promoter_param, derive_roster, ExpandState, PromoterDetail, RosterEntry,
    SessionContext, ViewError,
};
use serde::Deserialize;

use crate::html::{self, escape};

use super::{stale_load, view_error, AppState, NoticeQuery, PageError};

pub(super) async fn roster(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, PageError> {
    let session = ctx.require_session()?;
    let ticket = session.loads.begin();

    let visits = state
        .backend
        .fetch_visits(&session.access_token)
        .await
        .map_err(|e| PageError::from(view_error(&e)).context("No se pudieron cargar los promotores."))?;

    let Some(visits) = ticket.apply(visits) else {
        return Ok(stale_load("roster"));
    };

    let roster = derive_roster(&visits);
    let body = render_roster(&roster);
    Ok(Html(html::layout("Promotores", query.notice(), &body)).into_response())
}

fn render_roster(roster: &[RosterEntry]) -> String {
    let mut body = String::from("<h1 class=\"main-title\">Listado de Visitas por Promotor</h1>");
    if roster.is_empty() {
        body.push_str("<p class=\"no-data-message\">No se encontraron promotores con visitas.</p>");
        return body;
    }
    body.push_str("<div class=\"promoter-list\">");
    for entry in roster {
        body.push_str(&format!(
            "<div class=\"promoter-card\"><h3>{}</h3><p>Email: {}</p>\
             <a href=\"{}\" class=\"button primary\">Ver Detalles</a></div>",
            escape(&entry.name),
            escape(&entry.email),
            escape(&entry.detail_path()),
        ));
    }
    body.push_str("</div>");
    body
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DetailQuery {
    expanded: Option<String>,
}

pub(super) async fn promoter_detail(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    params: RawPathParams,
    Query(query): Query<DetailQuery>,
) -> Result<Response, PageError> {
    let session = ctx.require_session()?;
    let raw = params
        .iter()
        .find(|(key, _)| *key == "email")
        .map(|(_, value)| value)
        .ok_or_else(|| ViewError::NotFound("Promotor no especificado".to_string()))?;
    let email = decode_promoter_param(raw);
    let expand = ExpandState::from_param(query.expanded.as_deref());

    let ticket = session.loads.begin();
    let visits = state
        .backend
        .fetch_visits(&session.access_token)
        .await
        .map_err(|e| {
            PageError::from(view_error(&e))
                .context("No se pudieron cargar las visitas de este promotor.")
        })?;

    let Some(visits) = ticket.apply(visits) else {
        return Ok(stale_load("promoter_detail"));
    };

    let detail = PromoterDetail::build(&visits, &email);
    let body = render_detail(&detail, &expand);
    let title = format!("Visitas de {}", detail.display_name);
    Ok(Html(html::layout(&title, None, &body)).into_response())
}

fn render_detail(detail: &PromoterDetail, expand: &ExpandState) -> String {
    let mut body = format!(
        "<h1 class=\"main-title\">Visitas de {}</h1>\
         <a href=\"/\" class=\"button secondary back-button\">← Volver a Visitas de Promotores</a>",
        escape(&detail.display_name)
    );

    if detail.is_empty() {
        body.push_str("<p class=\"no-data-message\">No se encontraron visitas para este promotor.</p>");
        return body;
    }

    let base = format!("/promotor/{}", encode_promoter_param(&detail.email));
    body.push_str(
        "<table class=\"data-table\"><thead><tr><th>Comercio</th><th>Fecha/Hora</th>\
         <th>Ubicación</th><th>Acciones</th></tr></thead><tbody>",
    );
    for visit in &detail.visits {
        let open = expand.is_expanded(&visit.id);
        let href = match expand.toggled(&visit.id).expanded() {
            Some(id) => format!("{base}?expanded={}", encode_promoter_param(id)),
            None => base.clone(),
        };
        body.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"{}\" class=\"button primary small-button toggle-button\">{}</a></td></tr>",
            if open { " class=\"expanded-row\"" } else { "" },
            escape(&visit.commerce),
            escape(&visit.visited_at),
            escape(&visit.location()),
            escape(&href),
            if open { "Ocultar Detalles" } else { "Ver Detalles" },
        ));
        if open {
            body.push_str(&format!(
                "<tr class=\"detail-row\"><td colspan=\"4\">{}</td></tr>",
                render_visit_detail(visit)
            ));
        }
    }
    body.push_str("</tbody></table>");
    body
}

fn render_visit_detail(visit: &VisitRow) -> String {
    let coordinates = match &visit.coordinates {
        CoordinatesCell::MapLink { href, label } => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"map-link\">{}</a>",
            escape(href),
            escape(label)
        ),
        CoordinatesCell::Placeholder => NOT_AVAILABLE.to_string(),
    };

    let mut out = format!(
        "<div class=\"detail-content\">\
         <p><strong>Observaciones:</strong> {}</p>\
         <p><strong>Dirección Comercio:</strong> {}</p>\
         <p><strong>Coordenadas:</strong> {coordinates}</p>\
         <div class=\"detail-section-card\"><h4>Fotos de la Visita</h4>\
         <p>Antes: {}</p><p>Después: {}</p></div>",
        escape(&visit.observations),
        escape(&visit.address),
        photo(visit.photo_before.as_deref(), "Foto antes de la visita"),
        photo(visit.photo_after.as_deref(), "Foto después de la visita"),
    );

    if !visit.chispa_products.is_empty() {
        let rows: Vec<Vec<String>> = visit
            .chispa_products
            .iter()
            .map(|p| {
                vec![
                    escape(&p.product_name),
                    escape(&p.price),
                    escape(&p.currency),
                    escape(&p.shelf_stock),
                    escape(&p.general_stock),
                ]
            })
            .collect();
        out.push_str(&format!(
            "<div class=\"detail-section-card\"><h4>Productos Chispa</h4>{}</div>",
            html::data_table(
                &["Producto", "Precio", "Moneda", "Stock Anaquel", "Stock General"],
                &rows
            )
        ));
    }

    if !visit.competitor_products.is_empty() {
        let rows: Vec<Vec<String>> = visit
            .competitor_products
            .iter()
            .map(|p| vec![escape(&p.product_name), escape(&p.price), escape(&p.currency)])
            .collect();
        out.push_str(&format!(
            "<div class=\"detail-section-card\"><h4>Productos de Competencia</h4>{}</div>",
            html::data_table(&["Producto", "Precio", "Moneda"], &rows)
        ));
    }

    out.push_str("</div>");
    out
}

fn photo(url: Option<&str>, alt: &str) -> String {
    match url {
        Some(url) => format!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">\
             <img src=\"{url}\" alt=\"{}\" class=\"thumbnail-detail\"></a>",
            escape(alt),
            url = escape(url)
        ),
        None => NOT_AVAILABLE.to_string(),
    }
}
