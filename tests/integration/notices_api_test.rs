//! Integration tests for the notices and coupons HTTP surface
//!
//! Exercises the identity extractor (gateway headers) and the role gate on
//! management endpoints.

use actix_web::{http::StatusCode, test, web, App};
use medbank::routes;
use serde_json::json;
use uuid::Uuid;

use crate::common::TestDb;

macro_rules! init_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .configure(routes::notices::configure)
                .configure(routes::coupons::configure),
        )
        .await
    };
}

fn admin_headers(req: test::TestRequest) -> test::TestRequest {
    req.insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .insert_header(("X-User-Role", "admin"))
}

#[actix_web::test]
async fn test_missing_identity_is_unauthorized() {
    let db = TestDb::new().await;
    let app = init_app!(db.pool);

    let req = test::TestRequest::get().uri("/api/notices").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_student_role_is_forbidden_on_management() {
    let db = TestDb::new().await;
    let app = init_app!(db.pool);

    let req = test::TestRequest::post()
        .uri("/api/notices")
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .insert_header(("X-User-Role", "student"))
        .set_json(json!({ "title": "Nope", "body": "Nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_active_notice_endpoint_is_public() {
    let db = TestDb::new().await;
    let app = init_app!(db.pool);

    // Create and activate as admin
    let req = admin_headers(test::TestRequest::post().uri("/api/notices"))
        .set_json(json!({ "title": "Enrollment open", "body": "Go", "activate": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Read it back with no identity headers at all
    let req = test::TestRequest::get()
        .uri("/api/notices/active")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Enrollment open");
    assert_eq!(body["active"], true);
}

#[actix_web::test]
async fn test_activate_endpoint_swaps_the_active_notice() {
    let db = TestDb::new().await;
    let app = init_app!(db.pool);

    let req = admin_headers(test::TestRequest::post().uri("/api/notices"))
        .set_json(json!({ "title": "First", "body": "b", "activate": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = admin_headers(test::TestRequest::post().uri("/api/notices"))
        .set_json(json!({ "title": "Second", "body": "b" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let second: serde_json::Value = test::read_body_json(resp).await;
    let second_id = second["id"].as_str().expect("id").to_string();

    let req = admin_headers(test::TestRequest::post()
        .uri(&format!("/api/notices/{}/activate", second_id)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/notices/active")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Second");
}

#[actix_web::test]
async fn test_coupon_redemption_over_http() {
    let db = TestDb::new().await;
    let app = init_app!(db.pool);

    let req = admin_headers(test::TestRequest::post().uri("/api/coupons"))
        .set_json(json!({
            "code": "WELCOME",
            "discount_percent": 15,
            "max_uses": 1,
            "max_uses_per_user": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let user = Uuid::new_v4().to_string();
    let req = test::TestRequest::post()
        .uri("/api/coupons/redeem")
        .insert_header(("X-User-Id", user.clone()))
        .set_json(json!({ "code": "WELCOME" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["discount_percent"], 15);

    // Cap exhausted: a second user gets 409, not an error
    let req = test::TestRequest::post()
        .uri("/api/coupons/redeem")
        .insert_header(("X-User-Id", Uuid::new_v4().to_string()))
        .set_json(json!({ "code": "WELCOME" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
