use super::*;

fn test_client(base_url: &str) -> BackendClient {
    BackendClient::with_base_url(base_url, "anon-key", 30, "chispa-test")
        .expect("client construction should not fail")
}

#[test]
fn build_url_joins_path_under_base() {
    let client = test_client("https://project.backend.test");
    let url = client
        .build_url("rest/v1/rpc/get_full_visit_details", &[])
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://project.backend.test/rest/v1/rpc/get_full_visit_details"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("https://gateway.test/chispa/");
    let url = client.build_url("auth/v1/user", &[]).expect("url");
    assert_eq!(url.as_str(), "https://gateway.test/chispa/auth/v1/user");
}

#[test]
fn build_url_encodes_postgrest_filters() {
    let client = test_client("https://project.backend.test");
    let url = client
        .build_url("rest/v1/routes", &[("select", "*"), ("id", "eq.a b")])
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://project.backend.test/rest/v1/routes?select=*&id=eq.a+b"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = BackendClient::with_base_url("not a url", "k", 30, "ua").unwrap_err();
    assert!(matches!(err, BackendError::InvalidUrl { .. }));
}

#[test]
fn debug_redacts_anon_key() {
    let rendered = format!("{:?}", test_client("https://project.backend.test"));
    assert!(!rendered.contains("anon-key"));
}

#[test]
fn error_message_reads_postgrest_and_gotrue_shapes() {
    assert_eq!(
        error_message(r#"{"code":"42501","message":"permission denied for table routes"}"#)
            .as_deref(),
        Some("permission denied for table routes")
    );
    assert_eq!(
        error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
            .as_deref(),
        Some("Invalid login credentials")
    );
    assert_eq!(
        error_message(r#"{"code":422,"msg":"User already registered"}"#).as_deref(),
        Some("User already registered")
    );
    assert_eq!(error_message("<html>bad gateway</html>"), None);
}
