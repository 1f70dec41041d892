//! Admin panel. Every route here sits behind the admin gate.

mod commerces;
mod products;
mod routes;
mod screen;
mod users;

use axum::{extract::Query, response::Html, routing::get, Router};

use crate::html::{self, escape};
use crate::notice::Notice;

use super::{AppState, NoticeQuery};

const DASHBOARD: &str = "";
const ASSIGNMENTS: &str = "asignaciones";

/// Navigation entries: `(section, label)`.
const SECTIONS: [(&str, &str); 6] = [
    ("comercios", "Administrar Comercios"),
    ("users", "Administrar Usuarios"),
    ("rutas", "Administrar Rutas"),
    ("nuestros-productos", "Nuestros Productos"),
    ("competencia-productos", "Productos Competencia"),
    (ASSIGNMENTS, "Asignar Rutas"),
];

pub(super) fn router() -> Router<AppState> {
    let router = Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/asignaciones", get(assignments));
    let router = screen::mount::<routes::Routes>(router);
    let router = screen::mount::<commerces::Commerces>(router);
    let router = screen::mount::<users::Users>(router);
    let router = screen::mount::<products::ChispaProducts>(router);
    screen::mount::<products::CompetitorProducts>(router)
}

/// Wraps `content` in the panel chrome, highlighting `active`.
pub(crate) fn admin_layout(
    active: &str,
    title: &str,
    notice: Option<Notice>,
    content: &str,
) -> String {
    let mut body = String::from(
        "<h1 class=\"main-title\">Panel de Administración</h1><div class=\"admin-panel\">\
         <nav class=\"admin-nav\">",
    );
    for (section, label) in SECTIONS {
        let class = if section == active {
            "primary"
        } else {
            "secondary"
        };
        body.push_str(&format!(
            "<a href=\"/admin/{section}\" class=\"button {class}\">{}</a>",
            escape(label)
        ));
    }
    body.push_str(&html::post_button(
        "/logout",
        "Cerrar Sesión Admin",
        "danger",
        None,
    ));
    body.push_str("</nav><div class=\"admin-content\">");
    body.push_str(content);
    body.push_str("</div></div>");
    html::layout(title, notice, &body)
}

async fn dashboard(Query(query): Query<NoticeQuery>) -> Html<String> {
    Html(admin_layout(
        DASHBOARD,
        "Panel de Administración",
        query.notice(),
        "<h2>Bienvenido al Panel de Administración</h2>\
         <p>Selecciona una opción del menú de la izquierda para empezar a gestionar.</p>",
    ))
}

async fn assignments() -> Html<String> {
    Html(admin_layout(
        ASSIGNMENTS,
        "Asignar Rutas",
        None,
        "<h2>Asignar Rutas</h2><p>Contenido para Asignar Rutas (Próximamente)</p>",
    ))
}
