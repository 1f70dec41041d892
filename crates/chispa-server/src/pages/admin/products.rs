use chispa_backend::BackendClient;
use chispa_core::catalog::{
    ChispaPresentation, ChispaPresentationDraft, CompetitorProduct, CompetitorProductDraft,
    Currency,
};

use crate::html::{self, escape, Input};

use super::screen::{insert_draft, Refs, Rejection, Screen};

pub(crate) struct ChispaProducts;

fn currency_options() -> Vec<(String, String)> {
    [Currency::Ves, Currency::Usd]
        .into_iter()
        .map(|c| (c.code().to_string(), c.label().to_string()))
        .collect()
}

fn opt_text(value: Option<&String>) -> String {
    escape(value.map(String::as_str).unwrap_or_default())
}

impl Screen for ChispaProducts {
    type Record = ChispaPresentation;
    type Draft = ChispaPresentationDraft;
    type NewDraft = ChispaPresentationDraft;

    const SECTION: &'static str = "nuestros-productos";
    const TITLE: &'static str = "Administrar Presentaciones de Productos Chispa";
    const LIST_TITLE: &'static str = "Listado de Presentaciones";
    const NEW_HEADING: &'static str = "Añadir Nueva Presentación";
    const EDIT_HEADING: &'static str = "Editar Presentación";
    const ENTITY: &'static str = "presentación de producto";
    const CONFIRM_DELETE: &'static str =
        "¿Estás seguro de que quieres eliminar esta presentación de producto?";
    const EMPTY: &'static str = "No hay presentaciones de productos registradas.";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar presentación...";
    const HEADERS: &'static [&'static str] = &[
        "Nombre",
        "Categoría",
        "Descripción",
        "Precio Sugerido",
        "Moneda",
        "Activo",
    ];

    fn cells(record: &ChispaPresentation, _refs: &Refs) -> Vec<String> {
        vec![
            escape(&record.name),
            opt_text(record.categoria.as_ref()),
            opt_text(record.descripcion.as_ref()),
            record
                .precio_sugerido
                .map(|p| p.to_string())
                .unwrap_or_default(),
            opt_text(record.moneda.as_ref()),
            if record.activo.unwrap_or(false) { "Sí" } else { "No" }.to_string(),
        ]
    }

    fn edit_fields(draft: &ChispaPresentationDraft, _refs: &Refs) -> String {
        [
            Input::text("name", "Nombre del Producto:", &draft.name)
                .required()
                .render(),
            html::textarea("descripcion", "Descripción:", &draft.descripcion),
            Input::text("categoria", "Categoría:", &draft.categoria).render(),
            Input::text("precio_sugerido", "Precio Sugerido:", &draft.precio_sugerido)
                .required()
                .render(),
            html::select("moneda", "Moneda:", &currency_options(), &draft.moneda),
            html::checkbox("activo", "Activo", draft.activo.is_some()),
        ]
        .concat()
    }

    fn create_fields(draft: &ChispaPresentationDraft, refs: &Refs) -> String {
        Self::edit_fields(draft, refs)
    }

    async fn create(
        backend: &BackendClient,
        token: &str,
        draft: &ChispaPresentationDraft,
    ) -> Result<(), Rejection> {
        insert_draft::<Self>(backend, token, draft).await
    }
}

pub(crate) struct CompetitorProducts;

impl Screen for CompetitorProducts {
    type Record = CompetitorProduct;
    type Draft = CompetitorProductDraft;
    type NewDraft = CompetitorProductDraft;

    const SECTION: &'static str = "competencia-productos";
    const TITLE: &'static str = "Administrar Productos de Competencia";
    const LIST_TITLE: &'static str = "Listado de Productos de Competencia";
    const NEW_HEADING: &'static str = "Añadir Nuevo Producto de Competencia";
    const EDIT_HEADING: &'static str = "Editar Producto de Competencia";
    const ENTITY: &'static str = "producto de competencia";
    const CONFIRM_DELETE: &'static str =
        "¿Estás seguro de que quieres eliminar este producto de competencia?";
    const EMPTY: &'static str = "No hay productos de competencia registrados.";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar producto...";
    const HEADERS: &'static [&'static str] = &["Nombre", "Marca", "Categoría", "Notas"];

    fn cells(record: &CompetitorProduct, _refs: &Refs) -> Vec<String> {
        vec![
            escape(&record.name),
            opt_text(record.brand.as_ref()),
            opt_text(record.category.as_ref()),
            opt_text(record.notes.as_ref()),
        ]
    }

    fn edit_fields(draft: &CompetitorProductDraft, _refs: &Refs) -> String {
        [
            Input::text("name", "Nombre del Producto:", &draft.name)
                .required()
                .render(),
            Input::text("brand", "Marca:", &draft.brand).render(),
            Input::text("category", "Categoría:", &draft.category).render(),
            html::textarea("notes", "Notas:", &draft.notes),
        ]
        .concat()
    }

    fn create_fields(draft: &CompetitorProductDraft, refs: &Refs) -> String {
        Self::edit_fields(draft, refs)
    }

    async fn create(
        backend: &BackendClient,
        token: &str,
        draft: &CompetitorProductDraft,
    ) -> Result<(), Rejection> {
        insert_draft::<Self>(backend, token, draft).await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn presentation_cells_format_price_and_flag() {
        let record = ChispaPresentation {
            id: "7".to_string(),
            name: "Chispa 1L".to_string(),
            descripcion: None,
            categoria: Some("Bebidas".to_string()),
            precio_sugerido: Some(Decimal::new(1250, 2)),
            moneda: Some("USD".to_string()),
            activo: Some(true),
        };
        assert_eq!(
            ChispaProducts::cells(&record, &Refs::default()),
            vec!["Chispa 1L", "Bebidas", "", "12.50", "USD", "Sí"]
        );
    }

    #[test]
    fn blank_create_form_defaults_to_bolivares_and_active() {
        let fields =
            ChispaProducts::create_fields(&ChispaPresentationDraft::default(), &Refs::default());
        assert!(fields.contains("<option value=\"VES\" selected>VES (Bolívares)</option>"));
        assert!(fields.contains("name=\"activo\" checked"));
    }

    #[test]
    fn edit_form_reflects_inactive_record() {
        let draft = ChispaPresentationDraft {
            activo: None,
            ..ChispaPresentationDraft::default()
        };
        let fields = ChispaProducts::edit_fields(&draft, &Refs::default());
        assert!(!fields.contains("checked"));
    }
}
