use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::modules::purchases::adapters::outbound::catalog::CatalogStore;
use crate::modules::purchases::adapters::outbound::identity::IdentityStore;
use crate::modules::purchases::adapters::outbound::purchase_ledger::PurchaseLedger;
use crate::modules::purchases::adapters::outbound::purchase_ledger_in_memory::InMemoryPurchaseLedger;
use crate::modules::purchases::core::purchase::PurchaseStatus;
use crate::modules::purchases::core::transitions::LateSuccessPolicy;
use crate::shell::http::router;
use crate::tests::fixtures::signatures::{sign_stripe_now, stripe_event};
use crate::tests::fixtures::state::{COURSE, STUDENT, TestApp, bearer};

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(app.state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn checkout(app: &TestApp) -> String {
    let request = Request::post("/purchase/checkout")
        .header("content-type", "application/json")
        .header("authorization", bearer(STUDENT))
        .body(Body::from(json!({ "courseId": COURSE }).to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["purchaseId"].as_str().unwrap().to_string()
}

fn webhook(payload: Vec<u8>, signature: String) -> Request<Body> {
    Request::post("/purchase/webhook")
        .header("content-type", "application/json")
        .header("stripe-signature", signature)
        .body(Body::from(payload))
        .unwrap()
}

fn signed(event_type: &str, session_id: &str, payment_status: &str, amount: i64) -> Request<Body> {
    let payload = stripe_event(event_type, session_id, payment_status, amount);
    let signature = sign_stripe_now(&payload);
    webhook(payload, signature)
}

async fn status_of(app: &TestApp) -> (StatusCode, Value) {
    let request = Request::get(format!("/purchase/status/{COURSE}"))
        .header("authorization", bearer(STUDENT))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn is_enrolled(app: &TestApp) -> bool {
    let user = app.identity.find_user(STUDENT).await.unwrap().unwrap();
    let course = app.catalog.find_course(COURSE).await.unwrap().unwrap();
    let on_user = user.is_enrolled_in(COURSE);
    assert_eq!(on_user, course.enrolled_students.contains(STUDENT));
    on_user
}

#[tokio::test]
async fn it_should_complete_a_paid_checkout_and_enroll_the_student() {
    let app = TestApp::new();
    let purchase_id = checkout(&app).await;

    let (pending, body) = status_of(&app).await;
    assert_eq!(pending, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(!is_enrolled(&app).await);

    let (status, body) =
        send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "received": true }));

    let (_, body) = status_of(&app).await;
    assert_eq!(body["purchaseId"], purchase_id);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["amount"], "500");
    assert_eq!(body["isRefundable"], true);
    assert!(is_enrolled(&app).await);
}

#[tokio::test]
async fn it_should_grant_once_when_the_success_is_delivered_twice() {
    let app = TestApp::new();
    let purchase_id = checkout(&app).await;

    for _ in 0..2 {
        let (status, _) =
            send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let records = app.ledger.list_for_user(STUDENT).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].purchase_id, purchase_id);
    assert_eq!(records[0].status, PurchaseStatus::Completed);

    let user = app.identity.find_user(STUDENT).await.unwrap().unwrap();
    let course = app.catalog.find_course(COURSE).await.unwrap().unwrap();
    assert_eq!(user.enrolled_courses.len(), 1);
    assert_eq!(course.enrolled_students.len(), 1);
}

#[tokio::test]
async fn it_should_reject_a_forged_notification_without_side_effects() {
    let app = TestApp::new();
    checkout(&app).await;

    let payload = stripe_event("checkout.session.completed", "cs_test_1", "paid", 50_000);
    let (status, _) = send(&app, webhook(payload, "t=1,v1=deadbeef".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = status_of(&app).await;
    assert_eq!(body["status"], "pending");
    assert!(!is_enrolled(&app).await);
}

#[tokio::test]
async fn it_should_answer_not_found_for_an_unknown_session() {
    let app = TestApp::new();
    checkout(&app).await;

    let (status, _) =
        send(&app, signed("checkout.session.completed", "cs_test_999", "paid", 50_000)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = status_of(&app).await;
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn it_should_acknowledge_unrelated_events() {
    let app = TestApp::new();
    checkout(&app).await;

    let (status, body) =
        send(&app, signed("customer.created", "cs_test_1", "paid", 50_000)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    let (_, body) = status_of(&app).await;
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn it_should_keep_a_failed_purchase_failed_on_a_late_success() {
    let app = TestApp::new();
    checkout(&app).await;

    let (failed, _) = send(
        &app,
        signed("checkout.session.async_payment_failed", "cs_test_1", "unpaid", 50_000),
    )
    .await;
    assert_eq!(failed, StatusCode::OK);

    let (late, _) =
        send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;
    assert_eq!(late, StatusCode::OK);

    let (_, body) = status_of(&app).await;
    assert_eq!(body["status"], "failed");
    assert!(!is_enrolled(&app).await);
}

#[tokio::test]
async fn it_should_reopen_a_failed_purchase_when_configured_to() {
    let app = TestApp::with_policy(LateSuccessPolicy::Reopen);
    checkout(&app).await;

    send(
        &app,
        signed("checkout.session.expired", "cs_test_1", "unpaid", 50_000),
    )
    .await;
    let (late, _) =
        send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;
    assert_eq!(late, StatusCode::OK);

    let (_, body) = status_of(&app).await;
    assert_eq!(body["status"], "completed");
    assert!(is_enrolled(&app).await);
}

#[tokio::test]
async fn it_should_refuse_a_second_checkout_once_paid() {
    let app = TestApp::new();
    checkout(&app).await;
    send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;

    let request = Request::post("/purchase/checkout")
        .header("content-type", "application/json")
        .header("authorization", bearer(STUDENT))
        .body(Body::from(json!({ "courseId": COURSE }).to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.ledger.list_for_user(STUDENT).await.unwrap().len(), 1);
}

#[tokio::test]
async fn it_should_apply_concurrent_deliveries_once() {
    let ledger = InMemoryPurchaseLedger::new();
    ledger.set_delay_transition_ms(10);
    let app = TestApp::with_ledger(ledger);
    let purchase_id = checkout(&app).await;

    let (first, second) = tokio::join!(
        send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)),
        send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)),
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    let record = app.ledger.find(&purchase_id).await.unwrap().unwrap();
    assert_eq!(record.status, PurchaseStatus::Completed);
    let user = app.identity.find_user(STUDENT).await.unwrap().unwrap();
    assert_eq!(user.enrolled_courses.len(), 1);
}

#[tokio::test]
async fn it_should_list_the_course_once_paid() {
    let app = TestApp::new();
    let purchase_id = checkout(&app).await;
    send(&app, signed("checkout.session.completed", "cs_test_1", "paid", 50_000)).await;

    let request = Request::get("/purchase")
        .header("authorization", bearer(STUDENT))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["purchaseId"], purchase_id);
    assert_eq!(items[0]["course"]["courseId"], COURSE);
}
