//! Handler tests for the users endpoints, run against in-memory repositories.

use super::*;
use crate::inbound::http::test_utils::{memory_state, test_app};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

fn registration(email: &str) -> Value {
    json!({
        "email": email,
        "fullName": "Ana Perez",
        "password": "Secret123!",
        "phone": "912345678",
        "favoriteGenres": ["RPG", "Terror"],
    })
}

async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::post().uri(uri).set_json(body).to_request(),
    )
    .await
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn register_returns_profile_without_password() {
    let app = test::init_service(test_app(memory_state())).await;

    let res = post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "ana@duoc.cl");
    assert_eq!(body["fullName"], "Ana Perez");
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn register_rejects_duplicate_email_with_conflict() {
    let app = test::init_service(test_app(memory_state())).await;
    let first = post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["fields"][0]["code"], "already_registered");
}

#[actix_web::test]
async fn register_reports_every_invalid_field() {
    let app = test::init_service(test_app(memory_state())).await;

    let res = post_json(
        &app,
        "/api/users/register",
        json!({
            "email": "ana@gmail.com",
            "fullName": "Ana 3",
            "password": "weak",
            "favoriteGenres": [],
        }),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = body["details"]["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .filter_map(|entry| entry["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["fullName", "email", "password", "favoriteGenres"]);
}

#[rstest]
#[case("ana@duoc.cl", "Wrong123!")]
#[case("nobody@duoc.cl", "Secret123!")]
#[actix_web::test]
async fn login_failures_share_one_response(#[case] email: &str, #[case] password: &str) {
    let app = test::init_service(test_app(memory_state())).await;
    post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;

    let res = post_json(
        &app,
        "/api/users/login",
        json!({"email": email, "password": password}),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"code": "unauthorized", "message": "invalid credentials"})
    );
}

#[rstest]
#[case("  ", "Secret123!", "email")]
#[case("ana@duoc.cl", "", "password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let app = test::init_service(test_app(memory_state())).await;

    let res = post_json(
        &app,
        "/api/users/login",
        json!({"email": email, "password": password}),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["fields"][0]["field"], field);
}

#[actix_web::test]
async fn login_sets_session_used_by_profile_update() {
    let app = test::init_service(test_app(memory_state())).await;
    let registered: UserProfile = test::read_body_json(
        post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await,
    )
    .await;

    let login_res = post_json(
        &app,
        "/api/users/login",
        json!({"email": "ana@duoc.cl", "password": "Secret123!"}),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/users/{}", registered.id))
            .cookie(cookie)
            .set_json(json!({"fullName": "Ana Maria", "phone": ""}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let updated: UserProfile = test::read_body_json(res).await;
    assert_eq!(updated.full_name, "Ana Maria");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.email, registered.email);
    assert_eq!(updated.favorite_genres, registered.favorite_genres);
}

#[actix_web::test]
async fn profile_update_requires_session() {
    let app = test::init_service(test_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/users/1")
            .set_json(json!({"fullName": "Ana"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_update_refuses_other_users() {
    let app = test::init_service(test_app(memory_state())).await;
    post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;
    let other: UserProfile = test::read_body_json(
        post_json(&app, "/api/users/register", registration("luis@duoc.cl")).await,
    )
    .await;
    let login_res = post_json(
        &app,
        "/api/users/login",
        json!({"email": "ana@duoc.cl", "password": "Secret123!"}),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/users/{}", other.id))
            .cookie(session_cookie(&login_res))
            .set_json(json!({"fullName": "Hijacked"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn list_users_never_includes_passwords() {
    let app = test::init_service(test_app(memory_state())).await;
    post_json(&app, "/api/users/register", registration("ana@duoc.cl")).await;
    post_json(&app, "/api/users/register", registration("luis@duoc.cl")).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/users").to_request(),
    )
    .await;

    let users = body.as_array().expect("array");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|user| user.get("password").is_none()));
}
