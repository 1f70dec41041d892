use chispa_backend::{BackendClient, BackendError, SignUpMetadata};
use chispa_core::catalog::{NewUserDraft, Role, UserDraft, UserProfile};
use chispa_core::route_name;

use crate::html::{self, escape, Input};

use super::screen::{Refs, Rejection, Screen};

/// Auth API message for a sign-up with an email that already has an account.
const ALREADY_REGISTERED: &str = "User already registered";
const PROFILE_NOT_FOUND: &str =
    "Error al buscar usuario existente o usuario no encontrado en perfiles.";

pub(crate) struct Users;

fn role_options() -> Vec<(String, String)> {
    std::iter::once((String::new(), "-- Seleccionar Rol --".to_string()))
        .chain(
            [Role::Admin, Role::Promoter]
                .into_iter()
                .map(|r| (r.as_str().to_string(), r.label().to_string())),
        )
        .collect()
}

fn profile_fields(name: &str, email: &str, role: &str, route_id: &str, refs: &Refs) -> [String; 4] {
    [
        Input::text("name", "Nombre:", name).required().render(),
        Input::text("email", "Email:", email)
            .kind("email")
            .required()
            .render(),
        html::select("role", "Rol:", &role_options(), role),
        html::select("route_id", "Asignar a Ruta:", &refs.route_options(), route_id),
    ]
}

fn already_registered(error: &BackendError) -> bool {
    matches!(error, BackendError::Api { message, .. } if message.contains(ALREADY_REGISTERED))
}

impl Screen for Users {
    type Record = UserProfile;
    type Draft = UserDraft;
    type NewDraft = NewUserDraft;

    const SECTION: &'static str = "users";
    const TITLE: &'static str = "Administrar Usuarios";
    const LIST_TITLE: &'static str = "Lista de Usuarios Registrados";
    const NEW_HEADING: &'static str = "Añadir Nuevo Usuario";
    const EDIT_HEADING: &'static str = "Editar Usuario";
    const ENTITY: &'static str = "usuario";
    const CONFIRM_DELETE: &'static str = "¿Estás seguro de que quieres eliminar este usuario?";
    const EMPTY: &'static str = "No hay usuarios registrados o no se encontraron resultados.";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar usuario...";
    const HEADERS: &'static [&'static str] = &["Nombre", "Email", "Rol", "Ruta Asignada"];
    const NEEDS_ROUTES: bool = true;

    fn cells(record: &UserProfile, refs: &Refs) -> Vec<String> {
        vec![
            escape(&record.name),
            escape(&record.email),
            escape(&record.role),
            escape(route_name(&refs.routes, record.route_id.as_deref())),
        ]
    }

    fn edit_fields(draft: &UserDraft, refs: &Refs) -> String {
        profile_fields(&draft.name, &draft.email, &draft.role, &draft.route_id, refs).concat()
    }

    fn create_fields(draft: &NewUserDraft, refs: &Refs) -> String {
        let [name, email, role, route] =
            profile_fields(&draft.name, &draft.email, &draft.role, &draft.route_id, refs);
        let password = Input::text("password", "Contraseña:", "")
            .kind("password")
            .required()
            .render();
        [name, email, password, role, route].concat()
    }

    /// Registers the account, then writes its profile. An email that is
    /// already registered gets its existing profile updated instead.
    async fn create(
        backend: &BackendClient,
        token: &str,
        draft: &NewUserDraft,
    ) -> Result<(), Rejection> {
        let new_user = draft.validate()?;
        let metadata = SignUpMetadata {
            name: &new_user.profile.name,
            role: new_user.profile.role.as_str(),
        };

        match backend
            .sign_up(token, &new_user.email, &new_user.password, metadata)
            .await
        {
            Ok(user) => {
                backend
                    .insert_profile(token, &user.id, &new_user.profile)
                    .await?;
                Ok(())
            }
            Err(e) if already_registered(&e) => {
                tracing::info!("email already registered, updating existing profile");
                let existing = backend
                    .find_by::<UserProfile>(token, "email", &new_user.email)
                    .await
                    .map_err(|_| Rejection::Failed(PROFILE_NOT_FOUND))?;
                let profile = existing
                    .first()
                    .ok_or(Rejection::Failed(PROFILE_NOT_FOUND))?;
                backend
                    .update::<UserProfile>(token, &profile.id, &new_user.profile)
                    .await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_form_asks_for_password_and_edit_form_does_not() {
        let refs = Refs::default();
        let create = Users::create_fields(&NewUserDraft::default(), &refs);
        assert!(create.contains("type=\"password\""));
        let edit = Users::edit_fields(&UserDraft::default(), &refs);
        assert!(!edit.contains("type=\"password\""));
    }

    #[test]
    fn role_picker_offers_both_roles() {
        let draft = UserDraft {
            role: "promoter".to_string(),
            ..UserDraft::default()
        };
        let fields = Users::edit_fields(&draft, &Refs::default());
        assert!(fields.contains("<option value=\"admin\">Admin</option>"));
        assert!(fields.contains("<option value=\"promoter\" selected>Promotor</option>"));
    }

    #[test]
    fn only_the_duplicate_email_message_triggers_the_fallback() {
        let dup = BackendError::Api {
            status: 422,
            message: "User already registered".to_string(),
        };
        let other = BackendError::Api {
            status: 422,
            message: "Password should be at least 6 characters".to_string(),
        };
        assert!(already_registered(&dup));
        assert!(!already_registered(&other));
    }
}
