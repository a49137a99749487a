use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::shell::http::router;
use crate::tests::fixtures::signatures::{sign_stripe_now, stripe_event};
use crate::tests::fixtures::state::{ADMIN, COURSE, STUDENT, TestApp, bearer};

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(app.state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn paid_purchase(app: &TestApp) -> String {
    let request = Request::post("/purchase/checkout")
        .header("content-type", "application/json")
        .header("authorization", bearer(STUDENT))
        .body(Body::from(json!({ "courseId": COURSE }).to_string()))
        .unwrap();
    let (_, body) = send(app, request).await;
    let purchase_id = body["purchaseId"].as_str().unwrap().to_string();

    let payload = stripe_event("checkout.session.completed", "cs_test_1", "paid", 50_000);
    let signature = sign_stripe_now(&payload);
    let request = Request::post("/purchase/webhook")
        .header("stripe-signature", signature)
        .body(Body::from(payload))
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    purchase_id
}

fn refund(purchase_id: &str, actor: &str, body: Value) -> Request<Body> {
    Request::post(format!("/purchase/{purchase_id}/refund"))
        .header("content-type", "application/json")
        .header("authorization", bearer(actor))
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn it_should_refund_and_withdraw_the_enrollment() {
    let app = TestApp::new();
    let purchase_id = paid_purchase(&app).await;

    let (status, body) = send(
        &app,
        refund(&purchase_id, ADMIN, json!({ "amount": "200", "reason": "Course cancelled" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "refunded");
    assert_eq!(body["refundAmount"], "200");
    assert_eq!(body["refundReason"], "Course cancelled");
    assert_eq!(body["isRefundable"], false);

    let user = app.identity.find_user(STUDENT).await.unwrap().unwrap();
    let course = app.catalog.find_course(COURSE).await.unwrap().unwrap();
    assert!(!user.is_enrolled_in(COURSE));
    assert!(!course.enrolled_students.contains(STUDENT));

    let request = Request::get(format!("/purchase/status/{COURSE}"))
        .header("authorization", bearer(STUDENT))
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["status"], "refunded");
}

#[tokio::test]
async fn it_should_only_let_an_admin_refund() {
    let app = TestApp::new();
    let purchase_id = paid_purchase(&app).await;

    let (status, _) = send(
        &app,
        refund(&purchase_id, STUDENT, json!({ "reason": "Changed my mind" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let user = app.identity.find_user(STUDENT).await.unwrap().unwrap();
    assert!(user.is_enrolled_in(COURSE));
}

#[tokio::test]
async fn it_should_not_refund_more_than_was_paid() {
    let app = TestApp::new();
    let purchase_id = paid_purchase(&app).await;

    let (status, _) = send(
        &app,
        refund(&purchase_id, ADMIN, json!({ "amount": "500.01", "reason": "Overcharge" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
