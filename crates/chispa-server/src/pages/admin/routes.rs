use chispa_backend::BackendClient;
use chispa_core::catalog::{Route, RouteDraft};

use crate::html::{escape, Input};

use super::screen::{insert_draft, Refs, Rejection, Screen};

pub(crate) struct Routes;

impl Screen for Routes {
    type Record = Route;
    type Draft = RouteDraft;
    type NewDraft = RouteDraft;

    const SECTION: &'static str = "rutas";
    const TITLE: &'static str = "Administrar Rutas";
    const LIST_TITLE: &'static str = "Lista de Rutas";
    const NEW_HEADING: &'static str = "Añadir Nueva Ruta";
    const EDIT_HEADING: &'static str = "Editar Ruta";
    const ENTITY: &'static str = "ruta";
    const CONFIRM_DELETE: &'static str = "¿Estás seguro de que quieres eliminar esta ruta?";
    const EMPTY: &'static str = "No hay rutas registradas o no se encontraron resultados.";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar ruta...";
    const HEADERS: &'static [&'static str] = &["Nombre"];

    fn cells(record: &Route, _refs: &Refs) -> Vec<String> {
        vec![escape(&record.name)]
    }

    fn edit_fields(draft: &RouteDraft, _refs: &Refs) -> String {
        Input::text("name", "Nombre de la Ruta", &draft.name)
            .required()
            .render()
    }

    fn create_fields(draft: &RouteDraft, refs: &Refs) -> String {
        Self::edit_fields(draft, refs)
    }

    async fn create(
        backend: &BackendClient,
        token: &str,
        draft: &RouteDraft,
    ) -> Result<(), Rejection> {
        insert_draft::<Self>(backend, token, draft).await
    }
}
