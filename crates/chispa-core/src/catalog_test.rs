use rust_decimal::Decimal;
use serde_json::json;

use super::*;

fn routes() -> Vec<Route> {
    serde_json::from_value(json!([
        {"id": 1, "name": "Ruta Centro"},
        {"id": "b7c1", "name": "Ruta Este"}
    ]))
    .expect("routes fixture")
}

#[test]
fn numeric_and_text_ids_deserialize_as_text() {
    let routes = routes();
    assert_eq!(routes[0].id, "1");
    assert_eq!(routes[1].id, "b7c1");
}

#[test]
fn route_name_resolves_or_falls_back() {
    let routes = routes();
    assert_eq!(route_name(&routes, Some("1")), "Ruta Centro");
    assert_eq!(route_name(&routes, Some("999")), NO_ROUTE);
    assert_eq!(route_name(&routes, None), NO_ROUTE);
}

#[test]
fn search_is_case_insensitive_and_blank_keeps_all() {
    let routes = routes();
    let hits = search(&routes, Some("  ESTE "));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Ruta Este");

    assert_eq!(search(&routes, Some("")).len(), 2);
    assert_eq!(search(&routes, None).len(), 2);
    assert!(search(&routes, Some("oeste")).is_empty());
}

#[test]
fn user_search_covers_email_and_role() {
    let users: Vec<UserProfile> = serde_json::from_value(json!([
        {"id": "u1", "name": "Ana", "email": "ana@chispa.test", "role": "promoter"},
        {"id": "u2", "name": "Luis", "email": "luis@chispa.test", "role": "admin", "route_id": 3}
    ]))
    .expect("users fixture");

    assert_eq!(search(&users, Some("ana@")).len(), 1);
    assert_eq!(search(&users, Some("admin"))[0].id, "u2");
    assert_eq!(users[1].route_id.as_deref(), Some("3"));
}

#[test]
fn commerce_requires_name_and_address() {
    let draft = CommerceDraft {
        name: "  ".to_string(),
        address: "Calle 5".to_string(),
        ..CommerceDraft::default()
    };
    assert_eq!(draft.validate(), Err(CatalogError::Required("Nombre")));

    let draft = CommerceDraft {
        name: "Bodega".to_string(),
        ..CommerceDraft::default()
    };
    assert_eq!(draft.validate(), Err(CatalogError::Required("Dirección")));
}

#[test]
fn commerce_blank_optionals_become_null() {
    let draft = CommerceDraft {
        name: " Bodega Central ".to_string(),
        address: "Av. Bolívar 12".to_string(),
        phone: String::new(),
        contact_person: "Rosa".to_string(),
        route_id: String::new(),
    };
    let payload = draft.validate().expect("valid commerce");

    assert_eq!(payload.name, "Bodega Central");
    assert_eq!(payload.phone, None);
    assert_eq!(payload.contact_person.as_deref(), Some("Rosa"));
    let body = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(body["route_id"], serde_json::Value::Null);
}

#[test]
fn numeric_route_id_is_sent_as_number() {
    let draft = CommerceDraft {
        name: "Bodega".to_string(),
        address: "Calle 1".to_string(),
        route_id: "7".to_string(),
        ..CommerceDraft::default()
    };
    let body = serde_json::to_value(draft.validate().expect("valid")).expect("serialize");
    assert_eq!(body["route_id"], json!(7));

    let draft = CommerceDraft {
        route_id: "b7c1".to_string(),
        ..draft
    };
    let body = serde_json::to_value(draft.validate().expect("valid")).expect("serialize");
    assert_eq!(body["route_id"], json!("b7c1"));
}

#[test]
fn edit_form_prefills_from_record() {
    let commerce: Commerce = serde_json::from_value(json!({
        "id": 4,
        "name": "Kiosco",
        "address": "Plaza",
        "phone": null,
        "contact_person": "",
        "route_id": 2
    }))
    .expect("commerce");

    let draft = CommerceDraft::from_record(&commerce);
    assert_eq!(draft.route_id, "2");
    assert_eq!(draft.phone, "");
    assert_eq!(draft.contact_person, "");
    assert_eq!(draft.validate().expect("round trip").address, "Plaza");
}

#[test]
fn user_role_must_be_known() {
    let draft = UserDraft {
        name: "Ana".to_string(),
        email: "ana@chispa.test".to_string(),
        role: "supervisor".to_string(),
        route_id: String::new(),
    };
    assert_eq!(
        draft.validate(),
        Err(CatalogError::InvalidRole("supervisor".to_string()))
    );

    let draft = UserDraft {
        role: "promoter".to_string(),
        ..draft
    };
    let payload = draft.validate().expect("valid user");
    assert_eq!(payload.role, Role::Promoter);
    let body = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(body["role"], json!("promoter"));
}

#[test]
fn new_user_password_has_minimum_length() {
    let draft = NewUserDraft {
        name: "Ana".to_string(),
        email: "ana@chispa.test".to_string(),
        password: "12345".to_string(),
        role: "admin".to_string(),
        route_id: String::new(),
    };
    assert_eq!(draft.validate(), Err(CatalogError::PasswordTooShort));

    let draft = NewUserDraft {
        password: "123456".to_string(),
        ..draft
    };
    let user = draft.validate().expect("valid new user");
    assert_eq!(user.email, "ana@chispa.test");
    assert_eq!(user.profile.email, "ana@chispa.test");
    assert_eq!(user.profile.role, Role::Admin);
}

#[test]
fn new_user_requires_password() {
    let draft = NewUserDraft {
        name: "Ana".to_string(),
        email: "ana@chispa.test".to_string(),
        role: "admin".to_string(),
        ..NewUserDraft::default()
    };
    assert_eq!(draft.validate(), Err(CatalogError::Required("Contraseña")));
}

#[test]
fn presentation_parses_price_and_currency() {
    let draft = ChispaPresentationDraft {
        name: "Chispa 1L".to_string(),
        precio_sugerido: "2.50".to_string(),
        moneda: "USD".to_string(),
        activo: None,
        ..ChispaPresentationDraft::default()
    };
    let payload = draft.validate().expect("valid presentation");

    assert_eq!(payload.precio_sugerido, Decimal::new(250, 2));
    assert_eq!(payload.moneda, Currency::Usd);
    assert!(!payload.activo);
    assert_eq!(payload.descripcion, None);
}

#[test]
fn presentation_rejects_bad_price_and_currency() {
    let draft = ChispaPresentationDraft {
        name: "Chispa 1L".to_string(),
        precio_sugerido: "dos".to_string(),
        ..ChispaPresentationDraft::default()
    };
    assert_eq!(
        draft.validate(),
        Err(CatalogError::InvalidPrice("dos".to_string()))
    );

    let draft = ChispaPresentationDraft {
        precio_sugerido: "1".to_string(),
        moneda: "EUR".to_string(),
        ..draft
    };
    assert_eq!(
        draft.validate(),
        Err(CatalogError::InvalidCurrency("EUR".to_string()))
    );
}

#[test]
fn new_presentation_defaults_to_active_bolivares() {
    let draft = ChispaPresentationDraft::default();
    assert_eq!(draft.moneda, "VES");
    assert!(draft.activo.is_some());
}

#[test]
fn presentation_record_accepts_numeric_or_text_price() {
    let rows: Vec<ChispaPresentation> = serde_json::from_value(json!([
        {"id": 1, "name": "A", "precio_sugerido": 1.5, "moneda": "VES", "activo": true},
        {"id": 2, "name": "B", "precio_sugerido": "3.25", "activo": false}
    ]))
    .expect("presentations");

    assert_eq!(rows[0].precio_sugerido, Some(Decimal::new(15, 1)));
    let draft = ChispaPresentationDraft::from_record(&rows[1]);
    assert_eq!(draft.precio_sugerido, "3.25");
    assert_eq!(draft.moneda, "VES");
    assert_eq!(draft.activo, None);
}

#[test]
fn competitor_product_only_needs_a_name() {
    let draft = CompetitorProductDraft {
        name: "Rival 1L".to_string(),
        brand: " Marca X ".to_string(),
        ..CompetitorProductDraft::default()
    };
    let payload = draft.validate().expect("valid competitor product");
    assert_eq!(payload.brand.as_deref(), Some("Marca X"));
    assert_eq!(payload.notes, None);

    assert_eq!(
        CompetitorProductDraft::default().validate(),
        Err(CatalogError::Required("Nombre"))
    );
}

#[test]
fn errors_read_as_user_messages() {
    assert_eq!(
        CatalogError::Required("Nombre").to_string(),
        "El campo «Nombre» es obligatorio."
    );
    assert_eq!(
        CatalogError::PasswordTooShort.to_string(),
        "La contraseña debe tener al menos 6 caracteres."
    );
}

#[test]
fn unticked_checkbox_posts_as_inactive() {
    let draft: ChispaPresentationDraft = serde_json::from_value(json!({
        "name": "Chispa 2L",
        "precio_sugerido": "4",
        "moneda": "VES"
    }))
    .expect("form without activo");
    assert_eq!(draft.activo, None);
    assert!(!draft.validate().expect("valid").activo);
}
