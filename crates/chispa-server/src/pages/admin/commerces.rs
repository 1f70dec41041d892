use chispa_backend::BackendClient;
use chispa_core::catalog::{Commerce, CommerceDraft};
use chispa_core::route_name;

use crate::html::{self, escape, Input};

use super::screen::{insert_draft, Refs, Rejection, Screen};

pub(crate) struct Commerces;

fn or_na(value: Option<&String>) -> String {
    escape(
        value
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("N/A"),
    )
}

impl Screen for Commerces {
    type Record = Commerce;
    type Draft = CommerceDraft;
    type NewDraft = CommerceDraft;

    const SECTION: &'static str = "comercios";
    const TITLE: &'static str = "Administrar Comercios";
    const LIST_TITLE: &'static str = "Lista de Comercios Registrados";
    const NEW_HEADING: &'static str = "Añadir Nuevo Comercio";
    const EDIT_HEADING: &'static str = "Editar Comercio";
    const ENTITY: &'static str = "comercio";
    const CONFIRM_DELETE: &'static str = "¿Estás seguro de que quieres eliminar este comercio?";
    const EMPTY: &'static str = "No hay comercios registrados o no se encontraron resultados.";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar comercio...";
    const HEADERS: &'static [&'static str] = &[
        "Nombre",
        "Dirección",
        "Teléfono",
        "Contacto",
        "Ruta Asignada",
    ];
    const NEEDS_ROUTES: bool = true;

    fn cells(record: &Commerce, refs: &Refs) -> Vec<String> {
        vec![
            escape(&record.name),
            escape(record.address.as_deref().unwrap_or_default()),
            or_na(record.phone.as_ref()),
            or_na(record.contact_person.as_ref()),
            escape(route_name(&refs.routes, record.route_id.as_deref())),
        ]
    }

    fn edit_fields(draft: &CommerceDraft, refs: &Refs) -> String {
        [
            Input::text("name", "Nombre del Comercio", &draft.name)
                .required()
                .render(),
            Input::text("address", "Dirección", &draft.address)
                .required()
                .render(),
            Input::text("phone", "Teléfono", &draft.phone)
                .kind("tel")
                .render(),
            Input::text("contact_person", "Persona de Contacto", &draft.contact_person).render(),
            html::select(
                "route_id",
                "Asignar a Ruta:",
                &refs.route_options(),
                &draft.route_id,
            ),
        ]
        .concat()
    }

    fn create_fields(draft: &CommerceDraft, refs: &Refs) -> String {
        Self::edit_fields(draft, refs)
    }

    async fn create(
        backend: &BackendClient,
        token: &str,
        draft: &CommerceDraft,
    ) -> Result<(), Rejection> {
        insert_draft::<Self>(backend, token, draft).await
    }
}

#[cfg(test)]
mod tests {
    use chispa_core::catalog::Route;

    use super::*;

    fn refs() -> Refs {
        Refs {
            routes: vec![Route {
                id: "3".to_string(),
                name: "Ruta Centro".to_string(),
            }],
        }
    }

    fn commerce(route_id: Option<&str>) -> Commerce {
        Commerce {
            id: "1".to_string(),
            name: "Bodega <Sol>".to_string(),
            address: Some("Av. 1".to_string()),
            phone: None,
            contact_person: Some(" ".to_string()),
            route_id: route_id.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn cells_resolve_route_and_fill_placeholders() {
        let cells = Commerces::cells(&commerce(Some("3")), &refs());
        assert_eq!(
            cells,
            vec!["Bodega &lt;Sol&gt;", "Av. 1", "N/A", "N/A", "Ruta Centro"]
        );
    }

    #[test]
    fn unknown_route_shows_no_route_label() {
        let cells = Commerces::cells(&commerce(Some("99")), &refs());
        assert_eq!(cells[4], "Sin Ruta Asignada");
        let cells = Commerces::cells(&commerce(None), &refs());
        assert_eq!(cells[4], "Sin Ruta Asignada");
    }

    #[test]
    fn route_picker_preselects_current_route() {
        let draft = CommerceDraft {
            route_id: "3".to_string(),
            ..CommerceDraft::default()
        };
        let fields = Commerces::edit_fields(&draft, &refs());
        assert!(fields.contains("<option value=\"3\" selected>Ruta Centro</option>"));
        assert!(fields.contains("<option value=\"\">-- Seleccionar Ruta --</option>"));
    }
}
