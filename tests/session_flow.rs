mod common;

use std::sync::Arc;

use dashgate::auth::{login, logout, Credentials, DenialReason};
use dashgate::client::ApiError;
use dashgate::routes::Navigation;
use dashgate::startup::build_state;
use mockito::{Matcher, Server};
use serde_json::{json, Value};

use common::{config_yaml, load_test_config, memory_state, signed_token};

fn credentials(username: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: "correct horse".to_string(),
    }
}

fn redirect(to: &str, reason: DenialReason) -> Navigation {
    Navigation::Redirect {
        to: to.to_string(),
        reason,
    }
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let mut server = Server::new_async().await;
    let dev_token = signed_token("Dev", "dev-1");

    let login_mock = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJson(json!({"username": "dev-1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "token": dev_token }).to_string())
        .create_async()
        .await;
    let orders_mock = server
        .mock("GET", "/orders")
        .match_header("authorization", format!("Bearer {}", dev_token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "company": "ACME"}]"#)
        .create_async()
        .await;

    let state = memory_state(&server.url());
    let nav = &state.navigator;

    // Signed out: every guarded route goes to login, public ones render.
    assert_eq!(
        nav.navigate("/orders"),
        redirect("/login", DenialReason::NoSession)
    );
    assert!(matches!(nav.navigate("/"), Navigation::Render { .. }));

    let claims = login(
        &state.client,
        state.store.as_ref(),
        &state.config.api.login_path,
        &credentials("dev-1"),
    )
    .await
    .expect("login should succeed");
    assert_eq!(claims.role.as_deref(), Some("Dev"));
    login_mock.assert_async().await;

    // Signed in as Dev: orders render, settings are denied without a logout.
    assert!(matches!(
        nav.navigate("/orders"),
        Navigation::Render { claims: Some(_), .. }
    ));
    assert_eq!(
        nav.navigate("/settings"),
        redirect("/access-denied", DenialReason::RoleNotAllowed)
    );
    assert_eq!(state.store.get(), Some(dev_token.clone()));

    let orders: Value = state.client.get_json("/orders").await.unwrap();
    assert_eq!(orders[0]["company"], "ACME");
    orders_mock.assert_async().await;

    logout(state.store.as_ref()).unwrap();
    assert_eq!(
        nav.navigate("/orders"),
        redirect("/login", DenialReason::NoSession)
    );
}

#[tokio::test]
async fn test_backend_rejection_is_surfaced_not_handled() {
    let mut server = Server::new_async().await;
    let admin_token = signed_token("Admin", "root");
    let _m = server
        .mock("POST", "/analysis")
        .match_header("authorization", format!("Bearer {}", admin_token).as_str())
        .with_status(401)
        .with_body("token expired")
        .create_async()
        .await;

    let state = memory_state(&server.url());
    state.store.set(&admin_token).unwrap();

    let result: Result<Value, ApiError> = state
        .client
        .post_json_response("/analysis", &json!({"order_id": 9}))
        .await;
    match result {
        Err(ApiError::RemoteRejection { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "token expired");
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    // The client neither refreshes nor clears; the gate still admits the role.
    assert_eq!(state.store.get(), Some(admin_token));
    assert!(matches!(
        state.navigator.navigate("/analysis"),
        Navigation::Render { .. }
    ));
}

#[tokio::test]
async fn test_poisoned_token_is_cleared_on_navigation() {
    let server = Server::new_async().await;
    let state = memory_state(&server.url());
    state.store.set("header.%%%not-base64%%%.sig").unwrap();

    assert_eq!(
        state.navigator.navigate("/companies"),
        redirect("/login", DenialReason::InvalidToken)
    );
    assert_eq!(state.store.get(), None);
    assert_eq!(
        state.navigator.navigate("/companies"),
        redirect("/login", DenialReason::NoSession)
    );
}

#[tokio::test]
async fn test_custom_role_routes() {
    let server = Server::new_async().await;
    let state = memory_state(&server.url());
    state.store.set(&signed_token("Support", "helpdesk")).unwrap();

    let nav = &state.navigator;
    assert!(matches!(nav.navigate("/email-logs"), Navigation::Render { .. }));
    assert!(matches!(nav.navigate("/companies"), Navigation::Render { .. }));
    assert_eq!(
        nav.navigate("/orders"),
        redirect("/access-denied", DenialReason::RoleNotAllowed)
    );
    assert_eq!(
        nav.navigate("/unknown"),
        Navigation::NotFound {
            path: "/unknown".to_string()
        }
    );
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let store_block = format!(
        "  type: file\n  path: \"{}\"",
        dir.path().join("profile").join("storage.json").display()
    );
    let yaml = config_yaml(&server.url(), &store_block);

    let first = build_state(Arc::new(load_test_config(&yaml))).unwrap();
    first.store.set(&signed_token("Admin", "root")).unwrap();
    drop(first);

    let second = build_state(Arc::new(load_test_config(&yaml))).unwrap();
    assert!(matches!(
        second.navigator.navigate("/settings"),
        Navigation::Render { .. }
    ));

    logout(second.store.as_ref()).unwrap();
    logout(second.store.as_ref()).unwrap();
    assert_eq!(second.store.get(), None);
}
