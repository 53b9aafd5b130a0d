use cinema_booking::controllers::auth::{
    LOGIN_ERROR, LOGIN_FAILED, REGISTER_ERROR, REGISTRATION_FAILED, REGISTRATION_SUCCESS,
};
use cinema_booking::controllers::{AuthController, AuthError};
use cinema_booking::notifications::Variant;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::TestContext;

fn controller(ctx: &TestContext) -> AuthController {
    AuthController::new(ctx.api.clone(), ctx.session.clone(), ctx.snackbar.clone())
}

#[tokio::test]
async fn login_stores_token_and_name() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ann@example.com", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-1", "name": "Ann" })),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let name = controller(&ctx)
        .login("ann@example.com", "secret1")
        .await
        .unwrap();

    assert_eq!(name, "Ann");
    assert_eq!(ctx.session.token().as_deref(), Some("tok-1"));
    assert_eq!(ctx.session.user_name().as_deref(), Some("Ann"));
}

#[tokio::test]
async fn login_without_name_falls_back_to_email() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-2" })))
        .mount(&ctx.server)
        .await;

    let name = controller(&ctx)
        .login("bob@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(name, "bob@example.com");
    assert_eq!(ctx.session.user_name().as_deref(), Some("bob@example.com"));
}

#[tokio::test]
async fn login_without_token_is_reported_as_failure() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&ctx.server)
        .await;

    let result = controller(&ctx).login("ann@example.com", "secret1").await;
    assert!(matches!(result, Err(AuthError::Rejected)));
    assert!(!ctx.session.is_authenticated());

    let message = ctx.last_message().unwrap();
    assert_eq!(message.message, LOGIN_FAILED);
    assert_eq!(message.variant, Variant::Error);
}

#[tokio::test]
async fn login_transport_error_shows_generic_message() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&ctx.server)
        .await;

    let result = controller(&ctx).login("ann@example.com", "secret1").await;
    assert!(matches!(result, Err(AuthError::Api(_))));
    assert_eq!(ctx.last_message().unwrap().message, LOGIN_ERROR);
}

#[tokio::test]
async fn invalid_fields_never_reach_the_server() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let auth = controller(&ctx);

    let result = auth.login("not-an-email", "secret1").await;
    assert!(matches!(result, Err(AuthError::Invalid("Invalid email address"))));

    let result = auth.register("ann@example.com", "123", "Ann").await;
    assert!(matches!(
        result,
        Err(AuthError::Invalid("Password must be at least 6 characters long"))
    ));

    let result = auth.register("ann@example.com", "secret1", "  ").await;
    assert!(matches!(result, Err(AuthError::Invalid("Name cannot be empty"))));
    assert_eq!(ctx.last_message().unwrap().message, "Name cannot be empty");
}

#[tokio::test]
async fn register_logs_in_with_server_name() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "email": "ann@example.com",
            "password": "secret1",
            "name": "ann"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "tok-r",
            "user": { "id": 5, "email": "ann@example.com", "name": "Ann Lee", "role": "customer" }
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let response = controller(&ctx)
        .register("ann@example.com", "secret1", "ann")
        .await
        .unwrap();

    assert_eq!(response.user.unwrap().id, 5);
    assert_eq!(ctx.session.token().as_deref(), Some("tok-r"));
    assert_eq!(ctx.session.user_name().as_deref(), Some("Ann Lee"));

    let message = ctx.last_message().unwrap();
    assert_eq!(message.message, REGISTRATION_SUCCESS);
    assert_eq!(message.variant, Variant::Success);
}

#[tokio::test]
async fn register_failures_are_notified() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": null })))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Email taken"))
        .mount(&ctx.server)
        .await;

    let auth = controller(&ctx);

    let result = auth.register("ann@example.com", "secret1", "Ann").await;
    assert!(matches!(result, Err(AuthError::Rejected)));
    assert_eq!(ctx.last_message().unwrap().message, REGISTRATION_FAILED);

    let result = auth.register("ann@example.com", "secret1", "Ann").await;
    assert!(matches!(result, Err(AuthError::Api(_))));
    assert_eq!(ctx.last_message().unwrap().message, REGISTER_ERROR);
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_session() {
    let ctx = TestContext::new().await.logged_in("tok");
    controller(&ctx).logout().unwrap();
    assert!(!ctx.session.is_authenticated());
    assert_eq!(ctx.session.user_name(), None);
}
