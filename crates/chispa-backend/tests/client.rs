//! Integration tests for `BackendClient` using wiremock HTTP mocks.

use chispa_backend::{BackendClient, BackendError, SignUpMetadata};
use chispa_core::catalog::{ChispaPresentation, CommercePayload, Route, RoutePayload};
use rust_decimal::Decimal;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BackendClient {
    BackendClient::with_base_url(base_url, "anon-key", 30, "chispa-test")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_visits_posts_empty_body_with_user_token() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id_visita": 1,
            "email_promotor": "ana@chispa.test",
            "nombre_promotor": "Ana",
            "productos_chispa": null,
            "productos_competencia": []
        },
        {
            "id_visita": 2,
            "email_promotor": "bob@chispa.test",
            "nombre_promotor": null
        }
    ]);

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_full_visit_details"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .and(body_json(serde_json::json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let visits = client
        .fetch_visits("user-token")
        .await
        .expect("should parse visits");

    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].promoter_email(), Some("ana@chispa.test"));
    assert!(visits[0].chispa_products.is_empty());
    assert!(visits[1].promoter_name().is_none());
}

#[tokio::test]
async fn fetch_visits_surfaces_backend_message_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_full_visit_details"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "code": "42501",
            "message": "permission denied for function get_full_visit_details"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_visits("user-token")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(
        err.to_string(),
        "permission denied for function get_full_visit_details"
    );
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status_reason() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_full_visit_details"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>upstream</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_visits("user-token")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad Gateway");
}

#[tokio::test]
async fn malformed_rows_are_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_full_visit_details"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"not": "a list"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_visits("user-token")
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Deserialize { .. }), "{err:?}");
}

#[tokio::test]
async fn is_app_admin_reads_boolean_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/is_app_admin"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/is_app_admin"))
        .and(header("authorization", "Bearer promoter-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.is_app_admin("admin-token").await.expect("admin check"));
    assert!(!client
        .is_app_admin("promoter-token")
        .await
        .expect("promoter check"));
}

#[tokio::test]
async fn sign_in_uses_password_grant_and_anon_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("authorization", "Bearer anon-key"))
        .and(body_json(serde_json::json!({
            "email": "admin@chispa.test",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-xyz",
            "user": {"id": "uuid-1", "email": "admin@chispa.test", "aud": "authenticated"}
        })))
        .mount(&server)
        .await;

    let session = test_client(&server.uri())
        .sign_in_with_password("admin@chispa.test", "hunter22")
        .await
        .expect("sign in");

    assert_eq!(session.access_token, "jwt-abc");
    assert_eq!(session.user.id, "uuid-1");
    assert_eq!(session.expires_in, Some(3600));
    assert!(!format!("{session:?}").contains("jwt-abc"));
}

#[tokio::test]
async fn sign_in_failure_carries_error_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .sign_in_with_password("admin@chispa.test", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid login credentials");
}

#[tokio::test]
async fn sign_up_accepts_bare_user_or_session_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(serde_json::json!({
            "email": "new@chispa.test",
            "password": "secret1",
            "data": {"name": "Nueva", "role": "promoter"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "uuid-new",
            "email": "new@chispa.test",
            "confirmation_sent_at": "2025-03-01T10:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(serde_json::json!({
            "email": "auto@chispa.test",
            "password": "secret1",
            "data": {"name": "Auto", "role": "admin"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-new",
            "user": {"id": "uuid-auto", "email": "auto@chispa.test"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let user = client
        .sign_up(
            "admin-token",
            "new@chispa.test",
            "secret1",
            SignUpMetadata {
                name: "Nueva",
                role: "promoter",
            },
        )
        .await
        .expect("bare user");
    assert_eq!(user.id, "uuid-new");

    let user = client
        .sign_up(
            "admin-token",
            "auto@chispa.test",
            "secret1",
            SignUpMetadata {
                name: "Auto",
                role: "admin",
            },
        )
        .await
        .expect("session shape");
    assert_eq!(user.id, "uuid-auto");
}

#[tokio::test]
async fn sign_out_posts_to_logout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .sign_out("user-token")
        .await
        .expect("sign out");
}

#[tokio::test]
async fn list_orders_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/routes"))
        .and(query_param("select", "*"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "Ruta Centro", "created_at": "2025-01-01T00:00:00Z"},
            {"id": 1, "name": "Ruta Este"}
        ])))
        .mount(&server)
        .await;

    let routes: Vec<Route> = test_client(&server.uri())
        .list("user-token")
        .await
        .expect("routes");
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ruta Centro", "Ruta Este"]);
    assert_eq!(routes[0].id, "2");
}

#[tokio::test]
async fn get_returns_none_for_missing_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/chispa_presentations"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 7, "name": "Chispa 1L", "precio_sugerido": 2.5, "moneda": "USD", "activo": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/chispa_presentations"))
        .and(query_param("id", "eq.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found: Option<ChispaPresentation> = client.get("user-token", "7").await.expect("get 7");
    assert_eq!(
        found.expect("row 7").precio_sugerido,
        Some(Decimal::new(25, 1))
    );

    let missing: Option<ChispaPresentation> = client.get("user-token", "8").await.expect("get 8");
    assert!(missing.is_none());
}

#[tokio::test]
async fn insert_sends_payload_with_minimal_return() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/commerces"))
        .and(header("prefer", "return=minimal"))
        .and(body_json(serde_json::json!({
            "name": "Bodega",
            "address": "Calle 1",
            "phone": null,
            "contact_person": null,
            "route_id": 3
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CommercePayload {
        name: "Bodega".to_string(),
        address: "Calle 1".to_string(),
        phone: None,
        contact_person: None,
        route_id: Some(serde_json::json!(3)),
    };
    test_client(&server.uri())
        .insert::<chispa_core::catalog::Commerce>("user-token", &payload)
        .await
        .expect("insert");
}

#[tokio::test]
async fn update_and_delete_filter_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/routes"))
        .and(query_param("id", "eq.5"))
        .and(body_json(serde_json::json!({"name": "Ruta Sur"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/routes"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .update::<Route>(
            "user-token",
            "5",
            &RoutePayload {
                name: "Ruta Sur".to_string(),
            },
        )
        .await
        .expect("update");
    client
        .delete::<Route>("user-token", "5")
        .await
        .expect("delete");
}

#[tokio::test]
async fn delete_reports_foreign_key_violation() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/routes"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23503",
            "message": "update or delete on table \"routes\" violates foreign key constraint"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .delete::<Route>("user-token", "5")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(err.to_string().contains("violates foreign key constraint"));
}

#[tokio::test]
async fn find_by_filters_on_column() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/user_profiles"))
        .and(query_param("email", "eq.ana@chispa.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "uuid-ana", "name": "Ana", "email": "ana@chispa.test", "role": "promoter"}
        ])))
        .mount(&server)
        .await;

    let rows: Vec<chispa_core::catalog::UserProfile> = test_client(&server.uri())
        .find_by("admin-token", "email", "ana@chispa.test")
        .await
        .expect("find by email");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "uuid-ana");
}

#[tokio::test]
async fn insert_profile_flattens_payload_under_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/user_profiles"))
        .and(body_json(serde_json::json!({
            "id": "uuid-new",
            "name": "Nueva",
            "email": "new@chispa.test",
            "role": "promoter",
            "route_id": null
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let profile = chispa_core::catalog::UserProfilePayload {
        name: "Nueva".to_string(),
        email: "new@chispa.test".to_string(),
        role: chispa_core::catalog::Role::Promoter,
        route_id: None,
    };
    test_client(&server.uri())
        .insert_profile("admin-token", "uuid-new", &profile)
        .await
        .expect("insert profile");
}
