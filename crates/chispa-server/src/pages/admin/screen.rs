//! Generic list/create/update/delete handlers shared by every catalog screen.
//!
//! Each screen is a zero-sized type implementing [`Screen`]; the handlers are
//! instantiated per screen in [`mount`].

use std::future::Future;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Extension, Form, Router,
};
use chispa_backend::{BackendClient, BackendError};
use chispa_core::catalog::Route;
use chispa_core::{search, CatalogError, Draft, Session, SessionContext, Table, ViewError};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::html::{self, escape};
use crate::notice::Notice;
use crate::pages::{stale_load, view_error, AppState, PageError};

use super::admin_layout;

/// Reference data a screen needs besides its own records.
#[derive(Debug, Default)]
pub(crate) struct Refs {
    pub routes: Vec<Route>,
}

impl Refs {
    /// `(value, label)` options for a route picker, blank first.
    pub(crate) fn route_options(&self) -> Vec<(String, String)> {
        std::iter::once((String::new(), "-- Seleccionar Ruta --".to_string()))
            .chain(self.routes.iter().map(|r| (r.id.clone(), r.name.clone())))
            .collect()
    }
}

/// Why a mutation did not go through.
#[derive(Debug)]
pub(crate) enum Rejection {
    Invalid(CatalogError),
    Backend(BackendError),
    /// A precondition checked against backend data failed.
    Failed(&'static str),
}

impl Rejection {
    fn status(&self) -> StatusCode {
        match self {
            Rejection::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Rejection::Backend(_) | Rejection::Failed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Invalid(e) => write!(f, "{e}"),
            Rejection::Backend(e) => write!(f, "{e}"),
            Rejection::Failed(msg) => f.write_str(msg),
        }
    }
}

impl From<CatalogError> for Rejection {
    fn from(e: CatalogError) -> Self {
        Rejection::Invalid(e)
    }
}

impl From<BackendError> for Rejection {
    fn from(e: BackendError) -> Self {
        Rejection::Backend(e)
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Create => "añadir",
            Action::Update => "actualizar",
            Action::Delete => "eliminar",
        }
    }
}

/// One admin CRUD screen over a backend table.
pub(crate) trait Screen: Send + Sync + 'static {
    type Record: Table;
    /// Edit form input.
    type Draft: Draft<Record = Self::Record> + Sync;
    /// Create form input; the edit draft for most screens.
    type NewDraft: DeserializeOwned + Default + Send + Sync + 'static;

    /// Path segment under `/admin`.
    const SECTION: &'static str;
    const TITLE: &'static str;
    const LIST_TITLE: &'static str;
    const NEW_HEADING: &'static str;
    const EDIT_HEADING: &'static str;
    /// Noun used in error banners, e.g. "Error al eliminar <ENTITY>".
    const ENTITY: &'static str;
    const CONFIRM_DELETE: &'static str;
    const EMPTY: &'static str;
    const SEARCH_PLACEHOLDER: &'static str;
    /// Column headers, without the actions column.
    const HEADERS: &'static [&'static str];
    const NEEDS_ROUTES: bool = false;

    /// Escaped cells for one record, in [`Self::HEADERS`] order.
    fn cells(record: &Self::Record, refs: &Refs) -> Vec<String>;

    fn edit_fields(draft: &Self::Draft, refs: &Refs) -> String;

    fn create_fields(draft: &Self::NewDraft, refs: &Refs) -> String;

    fn create(
        backend: &BackendClient,
        token: &str,
        draft: &Self::NewDraft,
    ) -> impl Future<Output = Result<(), Rejection>> + Send;
}

/// Validates `draft` and inserts it; the `create` of screens whose create
/// form is their edit form.
pub(crate) async fn insert_draft<S: Screen>(
    backend: &BackendClient,
    token: &str,
    draft: &S::Draft,
) -> Result<(), Rejection> {
    let payload = draft.validate()?;
    backend.insert::<S::Record>(token, &payload).await?;
    Ok(())
}

fn base_path<S: Screen>() -> String {
    format!("/admin/{}", S::SECTION)
}

/// Registers the list, create, update and delete routes of `S`.
pub(crate) fn mount<S: Screen>(router: Router<AppState>) -> Router<AppState> {
    let base = base_path::<S>();
    let list: MethodRouter<AppState> = get(list::<S>).post(create::<S>);
    router
        .route(&base, list)
        .route(&format!("{base}/{{id}}"), post(update::<S>))
        .route(&format!("{base}/{{id}}/delete"), post(delete::<S>))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    q: Option<String>,
    edit: Option<String>,
    aviso: Option<String>,
}

struct Loaded<R> {
    records: Vec<R>,
    refs: Refs,
}

async fn load<S: Screen>(
    backend: &BackendClient,
    token: &str,
) -> Result<Loaded<S::Record>, BackendError> {
    let routes = async {
        if S::NEEDS_ROUTES {
            backend.list::<Route>(token).await
        } else {
            Ok(Vec::new())
        }
    };
    let (records, routes) = tokio::try_join!(backend.list::<S::Record>(token), routes)?;
    Ok(Loaded {
        records,
        refs: Refs { routes },
    })
}

/// The form half of a screen. `editing` holds the id of the record being
/// edited.
struct FormView {
    editing: Option<String>,
    fields: String,
}

impl FormView {
    fn render<S: Screen>(&self) -> String {
        let base = base_path::<S>();
        let (heading, action, submit) = match &self.editing {
            Some(id) => (S::EDIT_HEADING, format!("{base}/{id}"), "Guardar Cambios"),
            None => (S::NEW_HEADING, base.clone(), "Añadir"),
        };
        let mut out = format!(
            "<section class=\"admin-form\"><h3>{}</h3><form method=\"post\" action=\"{}\">{}\
             <button type=\"submit\" class=\"button primary\">{submit}</button>",
            escape(heading),
            escape(&action),
            self.fields
        );
        if self.editing.is_some() {
            out.push_str(&format!(
                " <a href=\"{}\" class=\"button secondary\">Cancelar</a>",
                escape(&base)
            ));
        }
        out.push_str("</form></section>");
        out
    }
}

/// Everything a screen page shows besides the navigation.
struct PageParts<'a, S: Screen> {
    query: Option<&'a str>,
    list: Result<&'a Loaded<S::Record>, String>,
    form: FormView,
    banner: Option<String>,
    notice: Option<Notice>,
}

fn render_screen<S: Screen>(parts: &PageParts<'_, S>) -> String {
    let base = base_path::<S>();
    let mut body = format!("<h2>{}</h2>", escape(S::TITLE));
    if let Some(banner) = &parts.banner {
        body.push_str(&html::error_banner(banner));
    }
    body.push_str(&parts.form.render::<S>());

    body.push_str(&format!(
        "<form method=\"get\" action=\"{}\" class=\"search-form\">\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"{}\">\
         <button type=\"submit\" class=\"button secondary\">Buscar</button></form>",
        escape(&base),
        escape(parts.query.unwrap_or_default()),
        escape(S::SEARCH_PLACEHOLDER),
    ));

    body.push_str(&format!("<h3>{}</h3>", escape(S::LIST_TITLE)));
    match &parts.list {
        Ok(loaded) => body.push_str(&render_list::<S>(loaded, parts.query)),
        // A banner about the failed mutation already explains the page.
        Err(_) if parts.banner.is_some() => {}
        Err(msg) => body.push_str(&html::error_banner(msg)),
    }

    admin_layout(S::SECTION, S::TITLE, parts.notice, &body)
}

fn render_list<S: Screen>(loaded: &Loaded<S::Record>, query: Option<&str>) -> String {
    let matches = search(&loaded.records, query);
    if matches.is_empty() {
        return format!("<p class=\"no-data-message\">{}</p>", escape(S::EMPTY));
    }

    let base = base_path::<S>();
    let mut headers: Vec<&str> = S::HEADERS.to_vec();
    headers.push("Acciones");
    let rows: Vec<Vec<String>> = matches
        .into_iter()
        .map(|record| {
            let id = record.id();
            let mut cells = S::cells(record, &loaded.refs);
            cells.push(format!(
                "<a href=\"{}?edit={}\" class=\"button secondary small-button\">Editar</a> {}",
                escape(&base),
                escape(id),
                html::post_button(
                    &format!("{base}/{id}/delete"),
                    "Eliminar",
                    "danger small-button",
                    Some(S::CONFIRM_DELETE),
                )
            ));
            cells
        })
        .collect();
    html::data_table(&headers, &rows)
}

fn load_context<S: Screen>() -> &'static str {
    if S::NEEDS_ROUTES {
        "No se pudieron cargar los registros o las rutas."
    } else {
        "No se pudieron cargar los registros."
    }
}

pub(crate) async fn list<S: Screen>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Result<Response, PageError> {
    let session = ctx.require_admin()?;
    let token = session.access_token.as_str();
    let ticket = session.loads.begin();

    let editing = query.edit.as_deref().filter(|id| !id.is_empty());
    let (loaded, record) = tokio::try_join!(load::<S>(&state.backend, token), async {
        match editing {
            Some(id) => state.backend.get::<S::Record>(token, id).await,
            None => Ok(None),
        }
    })
    .map_err(|e| PageError::from(view_error(&e)).context(load_context::<S>()))?;

    let Some((loaded, record)) = ticket.apply((loaded, record)) else {
        return Ok(stale_load(S::SECTION));
    };

    let form = match (editing, record) {
        (Some(id), Some(record)) => FormView {
            editing: Some(id.to_string()),
            fields: S::edit_fields(&S::Draft::from_record(&record), &loaded.refs),
        },
        (Some(id), None) => {
            return Err(ViewError::NotFound(format!("No existe {} con id {id}", S::ENTITY)).into())
        }
        (None, _) => FormView {
            editing: None,
            fields: S::create_fields(&S::NewDraft::default(), &loaded.refs),
        },
    };

    let notice = query.aviso.as_deref().and_then(Notice::from_code);
    let page = render_screen::<S>(&PageParts {
        query: query.q.as_deref(),
        list: Ok(&loaded),
        form,
        banner: None,
        notice,
    });
    Ok(Html(page).into_response())
}

/// Re-renders the screen after a failed mutation: the banner above a freshly
/// fetched list, and the form as the user left it.
async fn rejected<S: Screen>(
    state: &AppState,
    session: &Session,
    action: Action,
    rejection: Rejection,
    editing: Option<String>,
    fields: impl FnOnce(&Refs) -> String,
) -> Result<Response, PageError> {
    if let Rejection::Backend(e) = &rejection {
        if e.status() == Some(401) {
            return Err(view_error(e).into());
        }
    }
    tracing::warn!(
        section = S::SECTION,
        action = action.verb(),
        error = %rejection,
        "admin mutation rejected"
    );

    let ticket = session.loads.begin();
    let loaded = load::<S>(&state.backend, &session.access_token).await;
    let Some(loaded) = ticket.apply(loaded) else {
        return Ok(stale_load(S::SECTION));
    };

    let empty = Refs::default();
    let refs = loaded.as_ref().map_or(&empty, |l| &l.refs);
    let form = FormView {
        editing,
        fields: fields(refs),
    };
    let page = render_screen::<S>(&PageParts {
        query: None,
        list: loaded.as_ref().map_err(ToString::to_string),
        form,
        banner: Some(format!(
            "Error al {} {}: {rejection}",
            action.verb(),
            S::ENTITY
        )),
        notice: None,
    });
    Ok((rejection.status(), Html(page)).into_response())
}

pub(crate) async fn create<S: Screen>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(draft): Form<S::NewDraft>,
) -> Result<Response, PageError> {
    let session = ctx.require_admin()?;
    match S::create(&state.backend, &session.access_token, &draft).await {
        Ok(()) => {
            tracing::info!(section = S::SECTION, user_id = %session.user_id, "record created");
            Ok(Notice::Created.redirect(&base_path::<S>()).into_response())
        }
        Err(rejection) => {
            rejected::<S>(&state, session, Action::Create, rejection, None, |refs| {
                S::create_fields(&draft, refs)
            })
            .await
        }
    }
}

pub(crate) async fn update<S: Screen>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(draft): Form<S::Draft>,
) -> Result<Response, PageError> {
    let session = ctx.require_admin()?;
    let result = match draft.validate() {
        Ok(payload) => state
            .backend
            .update::<S::Record>(&session.access_token, &id, &payload)
            .await
            .map_err(Rejection::from),
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => {
            tracing::info!(section = S::SECTION, id = %id, user_id = %session.user_id, "record updated");
            Ok(Notice::Updated.redirect(&base_path::<S>()).into_response())
        }
        Err(rejection) => {
            rejected::<S>(&state, session, Action::Update, rejection, Some(id), |refs| {
                S::edit_fields(&draft, refs)
            })
            .await
        }
    }
}

pub(crate) async fn delete<S: Screen>(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let session = ctx.require_admin()?;
    match state
        .backend
        .delete::<S::Record>(&session.access_token, &id)
        .await
    {
        Ok(()) => {
            tracing::info!(section = S::SECTION, id = %id, user_id = %session.user_id, "record deleted");
            Ok(Notice::Deleted.redirect(&base_path::<S>()).into_response())
        }
        Err(e) => {
            rejected::<S>(&state, session, Action::Delete, e.into(), None, |refs| {
                S::create_fields(&S::NewDraft::default(), refs)
            })
            .await
        }
    }
}
